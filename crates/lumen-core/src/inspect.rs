#![forbid(unsafe_code)]

//! Element inspection port.
//!
//! The engine never walks the host's element tree. Hosts implement
//! [`InspectionPort`] and hand the engine opaque [`ElementHandle`]s; the port
//! turns each handle into an [`InspectionContext`] holding the resolved
//! visual and semantic properties checks read.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Port fault | `inspect` returns `Err` | Run fails, element reported |
//! | Malformed context | wrong handle, bad font size | Run fails, element reported |
//! | Unparseable color | bad color string | Affected checks not applicable |

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::finding::ElementHandle;

/// Geometric visibility as resolved by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// An id referenced from an attribute such as `aria-labelledby`, with the
/// host's answer to whether the id exists in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdReference {
    pub attribute: String,
    pub id: String,
    pub resolved: bool,
}

/// The subset of an element's resolved properties the checks read.
///
/// Color fields hold the host's textual representations; parsing happens in
/// the engine so an unparseable value degrades a single check, not the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionContext {
    pub element: ElementHandle,
    /// Lower-case tag name, when the host has one (`"img"`, `"button"`).
    #[serde(default)]
    pub tag: Option<String>,
    /// Text color.
    #[serde(default)]
    pub foreground: Option<String>,
    /// Background colors from the element outward through its ancestors,
    /// stopping at the first fully opaque layer.
    #[serde(default)]
    pub background_layers: Vec<String>,
    /// Border color of the element's visual boundary, if any.
    #[serde(default)]
    pub border: Option<String>,
    /// Font size in device-independent units.
    pub font_size: f32,
    /// Numeric font weight (400 regular, 700 bold).
    pub font_weight: u16,
    #[serde(default)]
    pub text: Option<String>,
    /// Explicitly declared role.
    #[serde(default)]
    pub role: Option<String>,
    /// ARIA states/properties plus related attributes (`tabindex`, `lang`, `alt`).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Resolved accessible name, if any.
    #[serde(default)]
    pub accessible_name: Option<String>,
    #[serde(default)]
    pub id_references: Vec<IdReference>,
}

impl InspectionContext {
    /// Minimal context: visible, 16px regular, no colors or semantics.
    #[must_use]
    pub fn new(element: ElementHandle) -> Self {
        Self {
            element,
            tag: None,
            foreground: None,
            background_layers: Vec::new(),
            border: None,
            font_size: 16.0,
            font_weight: 400,
            text: None,
            role: None,
            attributes: BTreeMap::new(),
            visibility: Visibility::Visible,
            accessible_name: None,
            id_references: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into().to_ascii_lowercase());
        self
    }

    #[must_use]
    pub fn with_foreground(mut self, color: impl Into<String>) -> Self {
        self.foreground = Some(color.into());
        self
    }

    /// Push a background layer (call innermost first).
    #[must_use]
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_layers.push(color.into());
        self
    }

    #[must_use]
    pub fn with_border(mut self, color: impl Into<String>) -> Self {
        self.border = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_font(mut self, size: f32, weight: u16) -> Self {
        self.font_size = size;
        self.font_weight = weight;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_id_reference(
        mut self,
        attribute: impl Into<String>,
        id: impl Into<String>,
        resolved: bool,
    ) -> Self {
        self.id_references.push(IdReference {
            attribute: attribute.into(),
            id: id.into(),
            resolved,
        });
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Trimmed text content, `None` when absent or whitespace only.
    #[must_use]
    pub fn visible_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        self.visible_text().is_some()
    }

    /// Trimmed accessible name, `None` when absent or blank.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.accessible_name
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Iterate over `aria-*` attributes only.
    pub fn aria_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|(k, _)| k.starts_with("aria-"))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Describe why this context cannot describe `expected`, if it cannot.
    #[must_use]
    pub fn malformation(&self, expected: ElementHandle) -> Option<String> {
        if self.element != expected {
            return Some(format!(
                "context describes {} instead of {expected}",
                self.element
            ));
        }
        if !self.font_size.is_finite() || self.font_size < 0.0 {
            return Some(format!("font size {} is not a valid size", self.font_size));
        }
        None
    }
}

/// A fault raised by a host port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortError {
    /// Operation that failed, e.g. `"inspect"`.
    pub operation: String,
    pub reason: String,
}

impl PortError {
    #[must_use]
    pub fn new(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.reason)
    }
}

impl std::error::Error for PortError {}

/// Host-implemented element inspection.
pub trait InspectionPort {
    /// Port name used in failure reports.
    fn name(&self) -> &str {
        "inspection"
    }

    /// Resolve one element into the properties checks need.
    fn inspect(&self, element: ElementHandle) -> Result<InspectionContext, PortError>;
}

impl<P: InspectionPort + ?Sized> InspectionPort for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn inspect(&self, element: ElementHandle) -> Result<InspectionContext, PortError> {
        (**self).inspect(element)
    }
}
