#![forbid(unsafe_code)]

//! Run snapshots and the score records derived from them.
//!
//! # Invariants
//!
//! 1. `score == 100 * passed / (passed + failed)`, and exactly 100 when both
//!    counts are zero (vacuous pass).
//! 2. `Run::overall_score` is the unweighted mean of its category scores.
//! 3. A `Run` is never mutated after creation; history owns it once appended.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criterion::{CriterionId, GuidelineId, Principle};
use crate::finding::{Finding, Severity};
use crate::level::ConformanceLevel;

/// Milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        let millis = web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self(millis)
    }

    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// `100 * passed / (passed + failed)`, or 100 when nothing was evaluated.
#[must_use]
pub fn score_from_counts(passed: u32, failed: u32) -> f64 {
    let total = passed as u64 + failed as u64;
    if total == 0 {
        100.0
    } else {
        100.0 * passed as f64 / total as f64
    }
}

/// Tally for one executed criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub criterion: CriterionId,
    pub passed: u32,
    pub failed: u32,
    pub warnings: u32,
    /// Evaluations skipped because an input could not be interpreted.
    #[serde(default)]
    pub not_applicable: u32,
    pub findings: Vec<Finding>,
}

impl SuiteResult {
    #[must_use]
    pub fn new(criterion: CriterionId) -> Self {
        Self {
            criterion,
            passed: 0,
            failed: 0,
            warnings: 0,
            not_applicable: 0,
            findings: Vec::new(),
        }
    }

    /// Number of pass/fail evaluations.
    #[must_use]
    pub fn evaluated(&self) -> u32 {
        self.passed + self.failed
    }

    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.evaluated() == 0
    }

    /// Record one finding, keeping the warning tally in sync.
    pub fn push_finding(&mut self, finding: Finding) {
        if finding.severity == Severity::Warning {
            self.warnings += 1;
        }
        self.findings.push(finding);
    }
}

/// Score for one principle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub principle: Principle,
    pub score: f64,
    pub passed_count: u32,
    pub failed_count: u32,
}

impl CategoryScore {
    #[must_use]
    pub fn from_counts(principle: Principle, passed_count: u32, failed_count: u32) -> Self {
        Self {
            principle,
            score: score_from_counts(passed_count, failed_count),
            passed_count,
            failed_count,
        }
    }

    /// No applicable checks ran: the 100 is a vacuous pass, not evidence.
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.passed_count == 0 && self.failed_count == 0
    }
}

/// Score for one guideline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineScore {
    pub guideline: GuidelineId,
    pub score: f64,
    pub passed_count: u32,
    pub failed_count: u32,
}

impl GuidelineScore {
    #[must_use]
    pub fn from_counts(guideline: GuidelineId, passed_count: u32, failed_count: u32) -> Self {
        Self {
            guideline,
            score: score_from_counts(passed_count, failed_count),
            passed_count,
            failed_count,
        }
    }

    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.passed_count == 0 && self.failed_count == 0
    }
}

/// Whether a run evaluated every element it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunCompleteness {
    Complete,
    /// Cancelled at an element boundary.
    Incomplete { evaluated: usize, total: usize },
}

/// One scored validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub timestamp: Timestamp,
    pub level: ConformanceLevel,
    pub overall_score: f64,
    pub category_scores: BTreeMap<Principle, CategoryScore>,
    #[serde(default)]
    pub guideline_scores: BTreeMap<GuidelineId, GuidelineScore>,
    #[serde(default)]
    pub suites: Vec<SuiteResult>,
    pub findings: Vec<Finding>,
    pub completeness: RunCompleteness,
}

impl Run {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completeness == RunCompleteness::Complete
    }

    #[must_use]
    pub fn category(&self, principle: Principle) -> Option<&CategoryScore> {
        self.category_scores.get(&principle)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Total pass/fail evaluations across every category.
    #[must_use]
    pub fn evaluated(&self) -> u32 {
        self.category_scores
            .values()
            .map(|c| c.passed_count + c.failed_count)
            .sum()
    }
}
