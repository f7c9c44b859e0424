//! Property-based invariant tests for scoring and history.
//!
//! 1. Every category score equals `100 · passed / (passed + failed)`, 100 when 0/0.
//! 2. The overall score is the unweighted mean of the category scores.
//! 3. Scores always lie in `[0, 100]`.
//! 4. Aggregation is pure.
//! 5. History stays sorted by timestamp whatever the append order.
//! 6. `trend(w)` yields `min(w, n) - 1` entries whose deltas match the runs.
//! 7. Regressions and improvements partition the non-stable trend entries.
//! 8. Projections stay in `[0, 100]`.
//! 9. Retention keeps exactly the newest runs.

use std::collections::BTreeMap;

use lumen_core::{ConformanceLevel, CriterionId, Run, RunCompleteness, SuiteResult, Timestamp};
use lumen_runtime::{Aggregator, HistoryTracker, RetentionPolicy, TrendClass, TrendConfig};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn criterion_strategy() -> impl Strategy<Value = CriterionId> {
    (1u8..=4, 1u8..=5, 1u8..=13).prop_map(|(p, g, c)| CriterionId::of(p, g, c))
}

fn suites_strategy() -> impl Strategy<Value = Vec<SuiteResult>> {
    proptest::collection::vec((criterion_strategy(), 0u32..50, 0u32..50), 0..12).prop_map(
        |raw| {
            // One suite per criterion, as the executor produces.
            let mut by_id: BTreeMap<CriterionId, SuiteResult> = BTreeMap::new();
            for (id, passed, failed) in raw {
                let suite = by_id.entry(id).or_insert_with(|| SuiteResult::new(id));
                suite.passed += passed;
                suite.failed += failed;
            }
            by_id.into_values().collect()
        },
    )
}

fn run(ts: u64, score: f64) -> Run {
    Run {
        timestamp: Timestamp::from_millis(ts),
        level: ConformanceLevel::AA,
        overall_score: score,
        category_scores: BTreeMap::new(),
        guideline_scores: BTreeMap::new(),
        suites: Vec::new(),
        findings: Vec::new(),
        completeness: RunCompleteness::Complete,
    }
}

fn runs_strategy() -> impl Strategy<Value = Vec<(u64, f64)>> {
    proptest::collection::vec((0u64..50, 0.0f64..=100.0), 0..16)
}

fn aggregate(suites: Vec<SuiteResult>) -> Run {
    Aggregator::new().aggregate(
        Timestamp::from_millis(1),
        ConformanceLevel::AA,
        suites,
        RunCompleteness::Complete,
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Aggregation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn category_scores_follow_counts(suites in suites_strategy()) {
        let run = aggregate(suites.clone());
        prop_assert_eq!(run.category_scores.len(), 4);
        for (principle, category) in &run.category_scores {
            let (passed, failed) = suites
                .iter()
                .filter(|s| s.criterion.principle() == *principle)
                .fold((0u32, 0u32), |(p, f), s| (p + s.passed, f + s.failed));
            prop_assert_eq!((category.passed_count, category.failed_count), (passed, failed));
            let expected = if passed + failed == 0 {
                100.0
            } else {
                100.0 * f64::from(passed) / f64::from(passed + failed)
            };
            prop_assert!((category.score - expected).abs() < 1e-9);
            prop_assert!((0.0..=100.0).contains(&category.score));
        }
    }

    #[test]
    fn overall_is_the_mean(suites in suites_strategy()) {
        let run = aggregate(suites);
        let mean = run.category_scores.values().map(|c| c.score).sum::<f64>() / 4.0;
        prop_assert!((run.overall_score - mean).abs() < 1e-9);
        prop_assert!((0.0..=100.0).contains(&run.overall_score));
    }

    #[test]
    fn aggregation_is_pure(suites in suites_strategy()) {
        prop_assert_eq!(aggregate(suites.clone()), aggregate(suites));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-9. History
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn history_stays_sorted(runs in runs_strategy()) {
        let history = HistoryTracker::default();
        for (ts, score) in &runs {
            history.append(run(*ts, *score));
        }
        let stored = history.runs();
        prop_assert_eq!(stored.len(), runs.len());
        prop_assert!(stored.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn trend_matches_consecutive_runs(runs in runs_strategy(), window in 0usize..20) {
        let history = HistoryTracker::default();
        for (ts, score) in &runs {
            history.append(run(*ts, *score));
        }
        let stored = history.runs();
        let trend = history.trend(window);
        let considered = window.min(stored.len());
        prop_assert_eq!(trend.len(), considered.saturating_sub(1));
        let tail = &stored[stored.len() - considered..];
        for (entry, pair) in trend.iter().zip(tail.windows(2)) {
            prop_assert_eq!(entry.score_delta, pair[1].overall_score - pair[0].overall_score);
            let expected = TrendConfig::default().classify(entry.score_delta);
            prop_assert_eq!(entry.classification, expected);
        }
    }

    #[test]
    fn regressions_and_improvements_partition_changes(runs in runs_strategy()) {
        let history = HistoryTracker::default();
        for (ts, score) in &runs {
            history.append(run(*ts, *score));
        }
        let trend = history.trend(usize::MAX);
        let changed = trend
            .iter()
            .filter(|e| e.classification != TrendClass::Stable)
            .count();
        prop_assert_eq!(
            history.regressions(usize::MAX).len() + history.improvements(usize::MAX).len(),
            changed
        );
        prop_assert!(history.regressions(usize::MAX).iter().all(|e| e.score_delta < 0.0));
    }

    #[test]
    fn projection_is_bounded(runs in runs_strategy()) {
        let history = HistoryTracker::default();
        for (ts, score) in &runs {
            history.append(run(*ts, *score));
        }
        match history.projection() {
            Some(p) => {
                prop_assert!((0.0..=100.0).contains(&p.projected_score));
                prop_assert!(p.runs_considered >= 2 && p.runs_considered <= 5);
            }
            None => prop_assert!(runs.len() < 2),
        }
    }

    #[test]
    fn retention_keeps_newest(runs in runs_strategy(), keep in 0usize..20) {
        let history = HistoryTracker::default();
        for (ts, score) in &runs {
            history.append(run(*ts, *score));
        }
        let before = history.runs();
        let removed = history.apply_retention(RetentionPolicy::KeepLatest(keep));
        let after = history.runs();
        prop_assert_eq!(removed, before.len().saturating_sub(keep));
        prop_assert_eq!(&after[..], &before[removed..]);
    }
}
