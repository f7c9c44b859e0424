#![forbid(unsafe_code)]

//! Color science for the Lumen accessibility engine.
//!
//! This crate provides:
//! - [`Color`] with alpha compositing and HSL conversion
//! - [`parse`] for the textual color forms hosts report
//! - [`ParseCache`] bounded memoization for repeated parses within a run
//! - WCAG relative luminance and contrast ratio ([`contrast`])
//! - Color-vision deficiency simulation ([`vision`])
//!
//! Every function here is pure and safe to call from any thread.

/// Color value type, compositing, and HSL conversion.
pub mod color;
/// Bounded parse memoization.
pub mod cache;
/// Luminance, contrast ratio, and requirement tables.
pub mod contrast;
/// Textual color parsing.
pub mod parse;
/// Color-vision deficiency simulation.
pub mod vision;

pub use cache::{CacheStats, ParseCache};
pub use color::{Color, Hsl, composite, flatten};
pub use contrast::{
    ContrastAssessment, NON_TEXT_RATIO, Shortfall, contrast_ratio, is_large_text,
    non_text_required_ratio, relative_luminance, required_ratio, suggest_foreground,
};
pub use parse::{ParseError, named, parse};
pub use vision::{
    DEFAULT_HUE_THRESHOLD, Deficiency, DeficiencySeverity, DeficiencyVisibility, Matrix3,
    UnknownDeficiency, check_visibility_under_deficiency, hue_difference, hue_too_similar,
    is_chromatic, simulate,
};
