#![forbid(unsafe_code)]

//! Findings: the typed result schema every check produces.
//!
//! A [`Finding`] ties one issue or warning to one element and one success
//! criterion. Findings are created once by a check (or by the executor when a
//! check faults) and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criterion::CriterionId;

/// Opaque handle into the host's element space.
///
/// The engine never dereferences a handle; it only passes it back to the host
/// inside findings and failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub u64);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured measurement attached to a finding.
///
/// Colors are carried as `#rrggbb[aa]` strings so the schema stays
/// independent of the color crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingDetail {
    /// A measured luminance contrast against its requirement.
    Contrast {
        foreground: String,
        background: String,
        ratio: f64,
        required: f64,
        large_text: bool,
    },
    /// Contrast re-measured after a color-vision deficiency transform.
    Deficiency {
        deficiency: String,
        simulated_ratio: f64,
        required: f64,
    },
    /// Two colors whose hues sit closer than the configured threshold.
    HueProximity {
        foreground: String,
        background: String,
        hue_delta: f64,
        threshold: f64,
    },
    /// An ARIA-style attribute and the value found on the element.
    Attribute {
        name: String,
        value: Option<String>,
    },
    /// The check itself failed while evaluating this element.
    CheckFault { check: String, reason: String },
}

/// One reported issue or warning tied to one element and one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub element: ElementHandle,
    pub criterion: CriterionId,
    /// Id of the atomic check that produced this finding.
    pub check: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FindingDetail>,
}

impl Finding {
    /// Create an error-severity finding.
    #[must_use]
    pub fn error(
        element: ElementHandle,
        criterion: CriterionId,
        check: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            element,
            criterion,
            check: check.into(),
            severity: Severity::Error,
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Create a warning-severity finding.
    #[must_use]
    pub fn warning(
        element: ElementHandle,
        criterion: CriterionId,
        check: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(element, criterion, check, message)
        }
    }

    /// Attach a remediation hint.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: FindingDetail) -> Self {
        self.details = Some(details);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} ({}): {}",
            self.severity, self.criterion, self.element, self.check, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> CriterionId {
        CriterionId::of(1, 4, 3)
    }

    #[test]
    fn warning_builder_keeps_fields() {
        let f = Finding::warning(ElementHandle(7), id(), "hue-proximity", "too close")
            .with_suggestion("shift hue");
        assert_eq!(f.severity, Severity::Warning);
        assert_eq!(f.element, ElementHandle(7));
        assert_eq!(f.check, "hue-proximity");
        assert_eq!(f.suggestion.as_deref(), Some("shift hue"));
        assert!(!f.is_error());
    }

    #[test]
    fn display_is_single_line() {
        let f = Finding::error(ElementHandle(3), id(), "text-contrast-minimum", "low contrast");
        assert_eq!(
            f.to_string(),
            "[error] 1.4.3 element#3 (text-contrast-minimum): low contrast"
        );
    }

    #[test]
    fn serde_omits_absent_optionals() {
        let f = Finding::error(ElementHandle(1), id(), "c", "m");
        let json = serde_json::to_string(&f).unwrap();
        assert!(!json.contains("suggestion"));
        assert!(!json.contains("details"));
        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn details_are_tagged() {
        let f = Finding::error(ElementHandle(1), id(), "c", "m").with_details(
            FindingDetail::Attribute {
                name: "aria-level".into(),
                value: Some("0".into()),
            },
        );
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"kind\":\"attribute\""));
    }
}
