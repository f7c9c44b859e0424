#![forbid(unsafe_code)]

//! Core: the data model shared by every layer of the Lumen engine.
//!
//! # Role in Lumen
//! `lumen-core` is the vocabulary layer. It owns the conformance levels, the
//! WCAG identifiers, the finding schema, the run snapshot, and the element
//! inspection port. Nothing here computes color math or runs checks.
//!
//! # Primary responsibilities
//! - **ConformanceLevel / Principle / CriterionId**: the standard's hierarchy keys.
//! - **Finding**: one reported issue or warning tied to one element and one rule.
//! - **Run**: the scored snapshot produced by one validation pass.
//! - **InspectionPort**: the seam through which hosts hand elements to the engine.
//!
//! # How it fits in the system
//! `lumen-color` and `lumen-rules` build on these types, and `lumen-runtime`
//! drives them against a host's elements. Downstream reporting tools consume
//! [`Run`] and [`Finding`] as read-only, serializable data.

pub mod criterion;
pub mod finding;
pub mod inspect;
pub mod level;
pub mod logging;
pub mod run;

pub use criterion::{CriterionId, CriterionIdError, GuidelineId, Principle};
pub use finding::{ElementHandle, Finding, FindingDetail, Severity};
pub use inspect::{IdReference, InspectionContext, InspectionPort, PortError, Visibility};
pub use level::{ConformanceLevel, LevelParseError};
pub use run::{
    CategoryScore, GuidelineScore, Run, RunCompleteness, SuiteResult, Timestamp,
    score_from_counts,
};
