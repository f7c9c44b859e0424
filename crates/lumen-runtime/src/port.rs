#![forbid(unsafe_code)]

//! In-memory inspection port.

use std::collections::BTreeMap;

use lumen_core::{ElementHandle, InspectionContext, InspectionPort, PortError};

/// Serves prepared contexts by handle.
///
/// Handles registered with [`with_fault`](Self::with_fault) fail to inspect,
/// which lets hosts replay a flaky environment deterministically.
#[derive(Debug, Clone, Default)]
pub struct StaticInspector {
    contexts: BTreeMap<ElementHandle, InspectionContext>,
    faults: BTreeMap<ElementHandle, String>,
}

impl StaticInspector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from contexts, keyed by their own handles.
    #[must_use]
    pub fn from_contexts(contexts: impl IntoIterator<Item = InspectionContext>) -> Self {
        contexts
            .into_iter()
            .fold(Self::new(), |port, ctx| port.with_context(ctx))
    }

    #[must_use]
    pub fn with_context(mut self, context: InspectionContext) -> Self {
        self.contexts.insert(context.element, context);
        self
    }

    /// Make inspecting `element` fail with `reason`.
    #[must_use]
    pub fn with_fault(mut self, element: ElementHandle, reason: impl Into<String>) -> Self {
        self.faults.insert(element, reason.into());
        self
    }

    /// Every known handle, ascending.
    #[must_use]
    pub fn handles(&self) -> Vec<ElementHandle> {
        let mut handles: Vec<ElementHandle> = self
            .contexts
            .keys()
            .chain(self.faults.keys())
            .copied()
            .collect();
        handles.sort_unstable();
        handles.dedup();
        handles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl InspectionPort for StaticInspector {
    fn name(&self) -> &str {
        "static"
    }

    fn inspect(&self, element: ElementHandle) -> Result<InspectionContext, PortError> {
        if let Some(reason) = self.faults.get(&element) {
            return Err(PortError::new("inspect", reason.clone()));
        }
        self.contexts
            .get(&element)
            .cloned()
            .ok_or_else(|| PortError::new("inspect", format!("unknown {element}")))
    }
}
