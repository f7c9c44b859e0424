#![forbid(unsafe_code)]

//! The atomic check contract.
//!
//! A [`Check`] is a pure predicate over one element. It is bound to exactly
//! one success criterion and one conformance level when the registry is
//! built, so the executor never dispatches on strings at run time.
//!
//! # Outcomes
//!
//! | Result | Meaning | Counted as |
//! |--------|---------|------------|
//! | `applies_to == false` | element is out of scope | nothing |
//! | `Ok(Evaluation::NotApplicable)` | an input could not be interpreted | `not_applicable` |
//! | `Ok(Evaluation::Outcome(o))` | evaluated | `passed` or `failed` |
//! | `Err(CheckError)` | the check itself failed | `failed`, one error finding |

use std::fmt;

use lumen_color::{DEFAULT_HUE_THRESHOLD, Deficiency};
use lumen_core::{ConformanceLevel, CriterionId, ElementHandle, Finding, InspectionContext};

use crate::resolve::ResolvedStyle;

/// Tunables the built-in checks read.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOptions {
    /// Gates the color-vision checks.
    pub deficiency_simulation_enabled: bool,
    /// Deficiencies simulated when enabled.
    pub deficiencies: Vec<Deficiency>,
    /// Hue-proximity threshold in degrees.
    pub hue_threshold: f64,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            deficiency_simulation_enabled: true,
            deficiencies: Deficiency::ALL.to_vec(),
            hue_threshold: DEFAULT_HUE_THRESHOLD,
        }
    }
}

/// Everything a check may read about one element.
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    pub context: &'a InspectionContext,
    /// Colors resolved once per element.
    pub style: &'a ResolvedStyle,
    /// Target level of the run.
    pub level: ConformanceLevel,
    pub options: &'a CheckOptions,
}

impl CheckInput<'_> {
    #[inline]
    #[must_use]
    pub fn element(&self) -> ElementHandle {
        self.context.element
    }
}

/// Result of one evaluated check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub issues: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl CheckOutcome {
    #[must_use]
    pub fn pass() -> Self {
        Self {
            passed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fail(issue: Finding) -> Self {
        Self {
            passed: false,
            issues: vec![issue],
            warnings: Vec::new(),
        }
    }

    /// Fails iff `issues` is non-empty.
    #[must_use]
    pub fn from_issues(issues: Vec<Finding>) -> Self {
        Self {
            passed: issues.is_empty(),
            issues,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_warning(mut self, warning: Finding) -> Self {
        self.warnings.push(warning);
        self
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = Finding>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Outcome(CheckOutcome),
    /// An input (usually a color string) could not be interpreted.
    NotApplicable,
}

impl From<CheckOutcome> for Evaluation {
    fn from(outcome: CheckOutcome) -> Self {
        Self::Outcome(outcome)
    }
}

/// A check could not evaluate an element it claimed to apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    pub reason: String,
}

impl CheckError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "check failed: {}", self.reason)
    }
}

impl std::error::Error for CheckError {}

/// One atomic, pure accessibility predicate.
pub trait Check: Send + Sync {
    /// Stable identifier, unique within a registry (`"text-contrast-minimum"`).
    fn id(&self) -> &'static str;

    fn criterion(&self) -> CriterionId;

    fn level(&self) -> ConformanceLevel;

    /// Cheap scope test; elements it rejects are not counted at all.
    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        let _ = input;
        true
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError>;

    /// Error finding attributed to this check.
    fn error(&self, element: ElementHandle, message: String) -> Finding {
        Finding::error(element, self.criterion(), self.id(), message)
    }

    /// Warning finding attributed to this check.
    fn warning(&self, element: ElementHandle, message: String) -> Finding {
        Finding::warning(element, self.criterion(), self.id(), message)
    }
}

impl fmt::Debug for dyn Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("id", &self.id())
            .field("criterion", &self.criterion())
            .field("level", &self.level())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_issues_sets_passed() {
        assert!(CheckOutcome::from_issues(Vec::new()).passed);
        let f = Finding::error(ElementHandle(1), CriterionId::of(4, 1, 2), "x", "y");
        let o = CheckOutcome::from_issues(vec![f]);
        assert!(!o.passed);
        assert_eq!(o.issues.len(), 1);
    }

    #[test]
    fn default_options_simulate_everything() {
        let o = CheckOptions::default();
        assert!(o.deficiency_simulation_enabled);
        assert_eq!(o.deficiencies.len(), Deficiency::ALL.len());
        assert_eq!(o.hue_threshold, 30.0);
    }
}
