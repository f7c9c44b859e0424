#![forbid(unsafe_code)]

//! Runtime: executes checks against host elements and tracks results over time.
//!
//! # Role in Lumen
//! `lumen-runtime` is where a validation pass actually happens. It pulls
//! elements through the host's [`InspectionPort`](lumen_core::InspectionPort),
//! runs the registry's checks, scores the results, and keeps the history that
//! regressions are detected from.
//!
//! # Primary responsibilities
//! - **Executor**: the `Idle → Collecting → Executing → Aggregating → Done` pipeline.
//! - **Aggregator**: suite results into category, guideline, and overall scores.
//! - **HistoryTracker**: append-only runs, trends, projections, retention.
//! - **RunStore**: persistence port with in-memory and JSON Lines stores.
//! - **AuditConfig**: defaults, builder setters, and environment overrides.
//!
//! # How it fits in the system
//! Hosts build an [`Executor`] over their port, call [`Executor::run`], and
//! append the resulting [`Run`](lumen_core::Run) to a [`HistoryTracker`].
//! Re-validation triggers belong to the host; the engine only exposes `run`.

pub mod aggregate;
pub mod config;
pub mod executor;
pub mod history;
pub mod port;
pub mod store;

pub use aggregate::{
    Aggregator, ComplianceLabel, Grade, IssueSummary, categories_needing_attention, top_issues,
};
pub use config::{AuditConfig, ConfigError};
pub use executor::{
    CancelToken, ElementState, Executor, RunContext, RunFailure, RunObserver, RunOptions,
    RunPhase,
};
pub use history::{
    AppendReport, CategoryChange, Confidence, HistoryTracker, Projection, RetentionPolicy,
    TrendClass, TrendConfig, TrendEntry,
};
pub use port::StaticInspector;
#[cfg(feature = "jsonl-store")]
pub use store::JsonlStore;
pub use store::{MemoryStore, RunStore, StoreError};
