#![forbid(unsafe_code)]

//! Rules: the WCAG 2.1 catalog, the check contract, and the built-in checks.
//!
//! # Role in Lumen
//! `lumen-rules` knows *what* to check. It owns the versioned rule registry
//! (principle → guideline → criterion → check), the role and attribute tables
//! the ARIA checks validate against, and per-element color resolution.
//!
//! # Primary responsibilities
//! - **RuleRegistry**: validated, immutable binding of checks to criteria.
//! - **Check**: the pure, per-element predicate every rule implements.
//! - **ResolvedStyle**: parsed and composited colors, computed once per element.
//!
//! # How it fits in the system
//! `lumen-runtime` asks the registry for the checks admitted by a target
//! level and feeds each one a [`CheckInput`]. Hosts can extend the registry
//! with their own [`Check`] implementations through [`RegistryBuilder`].

pub mod aria_roles;
pub mod catalog;
pub mod check;
pub mod checks;
pub mod registry;
pub mod resolve;

pub use check::{Check, CheckError, CheckInput, CheckOptions, CheckOutcome, Evaluation};
pub use registry::{
    Criterion, Guideline, RegistryBuilder, RegistryError, RegistryVersion, RuleRegistry,
};
pub use resolve::{ResolvedStyle, StyleFault, StyleSlot};
