#![forbid(unsafe_code)]

//! Run history and trend detection.
//!
//! [`HistoryTracker`] keeps every appended [`Run`] in timestamp order and
//! derives trends on demand. Trend entries are never stored.
//!
//! # Invariants
//!
//! 1. Runs are ordered by timestamp; equal timestamps keep insertion order.
//! 2. History only shrinks through [`HistoryTracker::apply_retention`].
//! 3. An append is all-or-nothing for readers (`RwLock`), and reaches the
//!    store in the same order it reaches memory.
//! 4. `|delta| < threshold` classifies as stable; otherwise the sign decides.
//!
//! ```text
//! runs:   r0 ── r1 ── r2 ── r3        trend(3) compares (r1,r2), (r2,r3)
//! ```
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Store rejects a run | logged, reported in [`AppendReport`], run kept in memory |
//! | Fewer than 2 runs | trend queries return empty, projection returns `None` |

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lumen_core::{Principle, Run, Timestamp};
use tracing::{info, warn};

use crate::config::{DEFAULT_TREND_THRESHOLD, DEFAULT_TREND_WINDOW};
use crate::store::{RunStore, StoreError};

/// Runs considered by [`HistoryTracker::projection`].
pub const PROJECTION_RUNS: usize = 5;

/// Trend query parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendConfig {
    /// Default number of most recent runs compared.
    pub window: usize,
    /// Score delta below which a change is stable.
    pub threshold: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_TREND_WINDOW,
            threshold: DEFAULT_TREND_THRESHOLD,
        }
    }
}

impl TrendConfig {
    /// Classify one score change.
    #[must_use]
    pub fn classify(&self, delta: f64) -> TrendClass {
        if delta.abs() < self.threshold {
            TrendClass::Stable
        } else if delta > 0.0 {
            TrendClass::Improvement
        } else {
            TrendClass::Regression
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendClass {
    Improvement,
    Regression,
    Stable,
}

impl TrendClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Improvement => "improvement",
            Self::Regression => "regression",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison of two consecutive runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendEntry {
    pub from_run: Timestamp,
    pub to_run: Timestamp,
    pub score_delta: f64,
    pub classification: TrendClass,
}

/// Per-principle change between the two latest runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChange {
    pub principle: Principle,
    pub from_score: f64,
    pub to_score: f64,
    pub delta: f64,
    pub classification: TrendClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Confidence from the variance of the scores a projection used.
    #[must_use]
    pub fn from_variance(variance: f64) -> Self {
        if variance < 5.0 {
            Self::High
        } else if variance < 10.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Expected next score from recent history.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Mean change per run.
    pub average_change: f64,
    /// Latest score plus `average_change`, clamped to `[0, 100]`.
    pub projected_score: f64,
    pub confidence: Confidence,
    pub runs_considered: usize,
}

/// Explicit history pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep only the newest `n` runs.
    KeepLatest(usize),
}

/// What happened to one appended run.
#[derive(Debug)]
pub struct AppendReport {
    /// Position of the run in timestamp order.
    pub index: usize,
    pub classification: Option<TrendClass>,
    /// Set when a store is attached and rejected the run.
    pub store_error: Option<StoreError>,
}

impl AppendReport {
    #[must_use]
    pub fn persisted(&self) -> bool {
        self.store_error.is_none()
    }
}

/// Append-only, timestamp-ordered run history.
pub struct HistoryTracker {
    runs: RwLock<Vec<Run>>,
    config: TrendConfig,
    store: Option<Box<dyn RunStore>>,
}

impl fmt::Debug for HistoryTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryTracker")
            .field("runs", &self.len())
            .field("config", &self.config)
            .field("store", &self.store.is_some())
            .finish()
    }
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new(TrendConfig::default())
    }
}

impl HistoryTracker {
    #[must_use]
    pub fn new(config: TrendConfig) -> Self {
        Self {
            runs: RwLock::new(Vec::new()),
            config,
            store: None,
        }
    }

    /// Persist every future append to `store`.
    #[must_use]
    pub fn with_store(mut self, store: impl RunStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Restore history from `store` and keep persisting to it.
    pub fn restore(
        config: TrendConfig,
        store: impl RunStore + 'static,
    ) -> Result<Self, StoreError> {
        let mut runs = store.load_history()?;
        runs.sort_by_key(|r| r.timestamp);
        info!(runs = runs.len(), "run history restored");
        Ok(Self {
            runs: RwLock::new(runs),
            config,
            store: Some(Box::new(store)),
        })
    }

    #[must_use]
    pub fn config(&self) -> TrendConfig {
        self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Run>> {
        self.runs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Run>> {
        self.runs.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert `run` after every run with an earlier or equal timestamp.
    ///
    /// The run is persisted while the write lock is held, so the store sees
    /// appends in the same order as memory.
    pub fn append(&self, run: Run) -> AppendReport {
        let mut runs = self.write();
        let store_error = self.store.as_ref().and_then(|store| match store.save(&run) {
            Ok(()) => None,
            Err(err) => {
                warn!(timestamp = %run.timestamp, error = %err, "run not persisted");
                Some(err)
            }
        });
        let index = runs.partition_point(|r| r.timestamp <= run.timestamp);
        let classification = index
            .checked_sub(1)
            .map(|prev| self.config.classify(run.overall_score - runs[prev].overall_score));
        runs.insert(index, run);
        AppendReport {
            index,
            classification,
            store_error,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of every run, oldest first.
    #[must_use]
    pub fn runs(&self) -> Vec<Run> {
        self.read().clone()
    }

    #[must_use]
    pub fn latest(&self) -> Option<Run> {
        self.read().last().cloned()
    }

    /// Consecutive comparisons among the last `window` runs, oldest first.
    #[must_use]
    pub fn trend(&self, window: usize) -> Vec<TrendEntry> {
        let runs = self.read();
        let start = runs.len().saturating_sub(window);
        runs[start..]
            .windows(2)
            .map(|pair| {
                let delta = pair[1].overall_score - pair[0].overall_score;
                TrendEntry {
                    from_run: pair[0].timestamp,
                    to_run: pair[1].timestamp,
                    score_delta: delta,
                    classification: self.config.classify(delta),
                }
            })
            .collect()
    }

    /// [`trend`](Self::trend) over the configured window.
    #[must_use]
    pub fn recent_trend(&self) -> Vec<TrendEntry> {
        self.trend(self.config.window)
    }

    #[must_use]
    pub fn regressions(&self, window: usize) -> Vec<TrendEntry> {
        self.filtered(window, TrendClass::Regression)
    }

    #[must_use]
    pub fn improvements(&self, window: usize) -> Vec<TrendEntry> {
        self.filtered(window, TrendClass::Improvement)
    }

    fn filtered(&self, window: usize, class: TrendClass) -> Vec<TrendEntry> {
        self.trend(window)
            .into_iter()
            .filter(|e| e.classification == class)
            .collect()
    }

    /// Principles whose score moved by at least the threshold between the
    /// two latest runs.
    #[must_use]
    pub fn category_changes(&self) -> Vec<CategoryChange> {
        let runs = self.read();
        let [.., before, after] = runs.as_slice() else {
            return Vec::new();
        };
        after
            .category_scores
            .iter()
            .filter_map(|(principle, now)| {
                let then = before.category_scores.get(principle)?;
                let delta = now.score - then.score;
                let classification = self.config.classify(delta);
                (classification != TrendClass::Stable).then_some(CategoryChange {
                    principle: *principle,
                    from_score: then.score,
                    to_score: now.score,
                    delta,
                    classification,
                })
            })
            .collect()
    }

    /// Average change over the last [`PROJECTION_RUNS`] runs.
    #[must_use]
    pub fn projection(&self) -> Option<Projection> {
        let runs = self.read();
        let recent = &runs[runs.len().saturating_sub(PROJECTION_RUNS)..];
        let (first, last) = (recent.first()?, recent.last()?);
        if recent.len() < 2 {
            return None;
        }
        let steps = (recent.len() - 1) as f64;
        let average_change = (last.overall_score - first.overall_score) / steps;
        let n = recent.len() as f64;
        let mean = recent.iter().map(|r| r.overall_score).sum::<f64>() / n;
        let variance = recent
            .iter()
            .map(|r| (r.overall_score - mean).powi(2))
            .sum::<f64>()
            / n;
        Some(Projection {
            average_change,
            projected_score: (last.overall_score + average_change).clamp(0.0, 100.0),
            confidence: Confidence::from_variance(variance),
            runs_considered: recent.len(),
        })
    }

    /// Prune history; returns how many runs were dropped.
    ///
    /// Only the in-memory history shrinks; stored runs are untouched.
    pub fn apply_retention(&self, policy: RetentionPolicy) -> usize {
        let mut runs = self.write();
        let removed = match policy {
            RetentionPolicy::KeepLatest(keep) => {
                let removed = runs.len().saturating_sub(keep);
                runs.drain(..removed);
                removed
            }
        };
        if removed > 0 {
            info!(removed, kept = runs.len(), "history retention applied");
        }
        removed
    }
}
