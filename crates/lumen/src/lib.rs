#![forbid(unsafe_code)]

//! Lumen: accessibility validation and scoring.
//!
//! This crate re-exports the engine's layers under one name:
//!
//! | Module | Crate | Owns |
//! |--------|-------|------|
//! | [`core`] | `lumen-core` | levels, criteria, findings, runs, the inspection port |
//! | [`color`] | `lumen-color` | parsing, contrast math, vision simulation |
//! | [`rules`] | `lumen-rules` | the WCAG 2.1 registry and built-in checks |
//! | [`runtime`] | `lumen-runtime` | executor, aggregation, history, stores |
//!
//! # Quick start
//!
//! ```
//! use lumen::prelude::*;
//!
//! let port = StaticInspector::new().with_context(
//!     InspectionContext::new(ElementHandle(1))
//!         .with_text("Hello")
//!         .with_foreground("#000000")
//!         .with_background("#ffffff"),
//! );
//! let run = lumen::audit(port, &[ElementHandle(1)]).unwrap();
//! assert!(run.overall_score > 0.0);
//! ```

pub use lumen_color as color;
pub use lumen_core as core;
pub use lumen_rules as rules;
pub use lumen_runtime as runtime;

pub use lumen_core::logging;

/// The names most hosts need.
pub mod prelude {
    pub use lumen_color::{Color, ContrastAssessment, Deficiency, contrast_ratio, parse};
    pub use lumen_core::{
        CategoryScore, ConformanceLevel, CriterionId, ElementHandle, Finding, FindingDetail,
        InspectionContext, InspectionPort, PortError, Principle, Run, RunCompleteness, Severity,
        SuiteResult, Timestamp,
    };
    pub use lumen_rules::{Check, CheckInput, CheckOptions, CheckOutcome, RuleRegistry};
    #[cfg(feature = "jsonl-store")]
    pub use lumen_runtime::JsonlStore;
    pub use lumen_runtime::{
        AuditConfig, CancelToken, Executor, HistoryTracker, MemoryStore, RunFailure,
        RunObserver, RunOptions, RunStore, StaticInspector, TrendClass, TrendConfig,
    };
}

/// Failure of [`audit`].
#[derive(Debug)]
pub enum AuditError {
    /// The built-in registry failed to assemble.
    Registry(lumen_rules::RegistryError),
    /// The run itself failed.
    Run(lumen_runtime::RunFailure),
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "registry: {err}"),
            Self::Run(err) => write!(f, "run: {err}"),
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Run(err) => Some(err),
        }
    }
}

impl From<lumen_rules::RegistryError> for AuditError {
    fn from(err: lumen_rules::RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<lumen_runtime::RunFailure> for AuditError {
    fn from(err: lumen_runtime::RunFailure) -> Self {
        Self::Run(err)
    }
}

/// Audit `elements` through `port` with the default configuration.
///
/// Shorthand for [`Executor::wcag21`](lumen_runtime::Executor::wcag21)
/// followed by [`audit`](lumen_runtime::Executor::audit).
pub fn audit<P: lumen_core::InspectionPort>(
    port: P,
    elements: &[lumen_core::ElementHandle],
) -> Result<lumen_core::Run, AuditError> {
    tracing::debug!(elements = elements.len(), "one-shot audit");
    Ok(lumen_runtime::Executor::wcag21(port)?.audit(elements)?)
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn one_shot_audit_scores_a_clean_paragraph() {
        let port = StaticInspector::new().with_context(
            InspectionContext::new(ElementHandle(1))
                .with_text("Hello")
                .with_foreground("#000000")
                .with_background("#ffffff"),
        );
        let run = super::audit(port, &[ElementHandle(1)]).unwrap();
        assert!(run.errors().next().is_none());
        assert_eq!(run.completeness, RunCompleteness::Complete);
    }

    #[test]
    fn audit_error_wraps_run_failures() {
        let port = StaticInspector::new().with_fault(ElementHandle(3), "detached");
        let err = super::audit(port, &[ElementHandle(3)]).unwrap_err();
        assert!(matches!(err, super::AuditError::Run(RunFailure::Inspection { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }
}
