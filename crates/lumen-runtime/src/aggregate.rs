#![forbid(unsafe_code)]

//! Suite results → category, guideline, and overall scores.
//!
//! # Mathematical Model
//!
//! ```text
//! score(c)  = 100 · passed(c) / (passed(c) + failed(c))     (100 when 0/0)
//! overall   = Σ score(c) / |categories|
//! ```
//!
//! Categories are unweighted: a principle with one evaluation counts as much
//! as a principle with a thousand.
//!
//! # Invariants
//!
//! 1. Without a principle filter all four principles appear, vacuous ones at 100.
//! 2. With a filter exactly the enabled principles appear.
//! 3. Aggregation is pure: identical suites and timestamp give identical runs.
//! 4. Findings keep suite order, then per-suite order.

use std::collections::BTreeMap;
use std::fmt;

use lumen_core::{
    CategoryScore, ConformanceLevel, CriterionId, GuidelineId, GuidelineScore, Principle, Run,
    RunCompleteness, SuiteResult, Timestamp,
};

/// Folds suite results into a [`Run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    principles: Option<Vec<Principle>>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report `principles`.
    #[must_use]
    pub fn with_principles(mut self, principles: Option<&[Principle]>) -> Self {
        self.principles = principles.map(<[Principle]>::to_vec);
        self
    }

    fn reported(&self) -> Vec<Principle> {
        match &self.principles {
            Some(list) => list.clone(),
            None => Principle::ALL.to_vec(),
        }
    }

    /// Build the run snapshot.
    #[must_use]
    pub fn aggregate(
        &self,
        timestamp: Timestamp,
        level: ConformanceLevel,
        mut suites: Vec<SuiteResult>,
        completeness: RunCompleteness,
    ) -> Run {
        suites.sort_by_key(|s| s.criterion);
        let reported = self.reported();

        let mut by_principle: BTreeMap<Principle, (u32, u32)> =
            reported.iter().map(|p| (*p, (0, 0))).collect();
        let mut by_guideline: BTreeMap<GuidelineId, (u32, u32)> = BTreeMap::new();
        for suite in suites
            .iter()
            .filter(|s| reported.contains(&s.criterion.principle()))
        {
            let p = by_principle
                .entry(suite.criterion.principle())
                .or_insert((0, 0));
            p.0 += suite.passed;
            p.1 += suite.failed;
            let g = by_guideline
                .entry(suite.criterion.guideline())
                .or_insert((0, 0));
            g.0 += suite.passed;
            g.1 += suite.failed;
        }

        let category_scores: BTreeMap<Principle, CategoryScore> = by_principle
            .into_iter()
            .map(|(p, (passed, failed))| (p, CategoryScore::from_counts(p, passed, failed)))
            .collect();
        let guideline_scores = by_guideline
            .into_iter()
            .map(|(g, (passed, failed))| (g, GuidelineScore::from_counts(g, passed, failed)))
            .collect();
        let overall_score = if category_scores.is_empty() {
            100.0
        } else {
            category_scores.values().map(|c| c.score).sum::<f64>() / category_scores.len() as f64
        };
        let findings = suites.iter().flat_map(|s| s.findings.iter().cloned()).collect();

        Run {
            timestamp,
            level,
            overall_score,
            category_scores,
            guideline_scores,
            suites,
            findings,
            completeness,
        }
    }
}

/// Letter grade for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    APlus,
    A,
    BPlus,
    B,
    CPlus,
    C,
    DPlus,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 95.0 => Self::APlus,
            s if s >= 90.0 => Self::A,
            s if s >= 85.0 => Self::BPlus,
            s if s >= 80.0 => Self::B,
            s if s >= 75.0 => Self::CPlus,
            s if s >= 70.0 => Self::C,
            s if s >= 65.0 => Self::DPlus,
            s if s >= 60.0 => Self::D,
            _ => Self::F,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse compliance band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplianceLabel {
    FullyCompliant,
    PartiallyCompliant,
    LevelACompliant,
    PartialLevelA,
    NonCompliant,
}

impl ComplianceLabel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            Self::FullyCompliant
        } else if score >= 85.0 {
            Self::PartiallyCompliant
        } else if score >= 75.0 {
            Self::LevelACompliant
        } else if score >= 65.0 {
            Self::PartialLevelA
        } else {
            Self::NonCompliant
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullyCompliant => "fully compliant",
            Self::PartiallyCompliant => "partially compliant",
            Self::LevelACompliant => "level A compliant",
            Self::PartialLevelA => "partial level A",
            Self::NonCompliant => "non-compliant",
        }
    }
}

impl fmt::Display for ComplianceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error findings of one criterion, summarized.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSummary {
    pub criterion: CriterionId,
    pub count: usize,
    /// Message of the first finding, as a representative example.
    pub example: String,
}

/// Error findings grouped by criterion, most frequent first, ties by id.
#[must_use]
pub fn top_issues(run: &Run, limit: usize) -> Vec<IssueSummary> {
    let mut grouped: BTreeMap<CriterionId, IssueSummary> = BTreeMap::new();
    for finding in run.errors() {
        grouped
            .entry(finding.criterion)
            .and_modify(|s| s.count += 1)
            .or_insert_with(|| IssueSummary {
                criterion: finding.criterion,
                count: 1,
                example: finding.message.clone(),
            });
    }
    let mut issues: Vec<IssueSummary> = grouped.into_values().collect();
    issues.sort_by(|a, b| b.count.cmp(&a.count).then(a.criterion.cmp(&b.criterion)));
    issues.truncate(limit);
    issues
}

/// Non-vacuous categories scoring below `threshold`, lowest first.
#[must_use]
pub fn categories_needing_attention(run: &Run, threshold: f64) -> Vec<&CategoryScore> {
    let mut weak: Vec<&CategoryScore> = run
        .category_scores
        .values()
        .filter(|c| !c.is_vacuous() && c.score < threshold)
        .collect();
    weak.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.principle.cmp(&b.principle)));
    weak
}
