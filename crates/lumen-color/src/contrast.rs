//! WCAG relative luminance and contrast ratio.
//!
//! # Invariants
//!
//! 1. `contrast_ratio(a, b) == contrast_ratio(b, a)`.
//! 2. `1.0 <= contrast_ratio(a, b) <= 21.0` for every pair.
//! 3. Alpha is ignored; callers composite onto an opaque background first.

use lumen_core::ConformanceLevel;

use crate::color::{Color, Hsl};

/// Minimum ratio for user-interface components and graphical objects.
pub const NON_TEXT_RATIO: f64 = 3.0;

const MIN_RATIO: f64 = 1.0;
const MAX_RATIO: f64 = 21.0;

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance in `0.0..=1.0`.
#[must_use]
pub fn relative_luminance(color: Color) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// `(L_hi + 0.05) / (L_lo + 0.05)`, clamped to `[1, 21]`.
#[must_use]
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    ((hi + 0.05) / (lo + 0.05)).clamp(MIN_RATIO, MAX_RATIO)
}

/// At least 18 units, or at least 14 units when bold (weight 700+).
#[must_use]
pub fn is_large_text(font_size: f32, font_weight: u16) -> bool {
    font_size >= 18.0 || (font_size >= 14.0 && font_weight >= 700)
}

/// Text contrast requirement at `level`.
///
/// Level A sets no contrast requirement and yields `None`.
#[must_use]
pub fn required_ratio(large_text: bool, level: ConformanceLevel) -> Option<f64> {
    match (level, large_text) {
        (ConformanceLevel::A, _) => None,
        (ConformanceLevel::AA, false) => Some(4.5),
        (ConformanceLevel::AA, true) => Some(3.0),
        (ConformanceLevel::AAA, false) => Some(7.0),
        (ConformanceLevel::AAA, true) => Some(4.5),
    }
}

#[must_use]
pub const fn non_text_required_ratio() -> f64 {
    NON_TEXT_RATIO
}

/// How far a failing ratio falls below its requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shortfall {
    /// Less than half the required ratio.
    Critical,
    /// Less than 80% of the required ratio.
    Serious,
    Minor,
}

impl Shortfall {
    #[must_use]
    pub fn classify(ratio: f64, required: f64) -> Self {
        let fraction = ratio / required;
        if fraction < 0.5 {
            Self::Critical
        } else if fraction < 0.8 {
            Self::Serious
        } else {
            Self::Minor
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Serious => "serious",
            Self::Minor => "minor",
        }
    }
}

/// Measured contrast of one text pair against a level's requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastAssessment {
    pub ratio: f64,
    pub required: Option<f64>,
    pub large_text: bool,
    pub passes: bool,
    /// Set only when the pair fails.
    pub shortfall: Option<Shortfall>,
}

impl ContrastAssessment {
    #[must_use]
    pub fn assess(
        foreground: Color,
        background: Color,
        large_text: bool,
        level: ConformanceLevel,
    ) -> Self {
        let ratio = contrast_ratio(foreground, background);
        let required = required_ratio(large_text, level);
        Self::against(ratio, required, large_text)
    }

    /// Assess an already measured ratio.
    #[must_use]
    pub fn against(ratio: f64, required: Option<f64>, large_text: bool) -> Self {
        let passes = required.is_none_or(|r| ratio >= r);
        let shortfall = match required {
            Some(r) if !passes => Some(Shortfall::classify(ratio, r)),
            _ => None,
        };
        Self {
            ratio,
            required,
            large_text,
            passes,
            shortfall,
        }
    }
}

/// Nearest foreground along the HSL lightness axis that meets `required`.
///
/// Hue and saturation of `foreground` are kept. Returns `foreground` itself
/// when it already passes and `None` when no lightness reaches the ratio.
#[must_use]
pub fn suggest_foreground(foreground: Color, background: Color, required: f64) -> Option<Color> {
    if contrast_ratio(foreground, background) >= required {
        return Some(foreground);
    }
    let hsl = foreground.to_hsl();
    let base = hsl.l.round() as i32;
    let candidate = |l: i32| {
        let c = Color::from_hsl(Hsl::new(hsl.h, hsl.s, f64::from(l)), 1.0);
        let ratio = contrast_ratio(c, background);
        (ratio >= required).then_some((c, ratio))
    };
    for step in 1..=100 {
        let darker = (base - step >= 0).then(|| candidate(base - step)).flatten();
        let lighter = (base + step <= 100).then(|| candidate(base + step)).flatten();
        match (darker, lighter) {
            (Some((d, dr)), Some((l, lr))) => return Some(if dr >= lr { d } else { l }),
            (Some((d, _)), None) => return Some(d),
            (None, Some((l, _))) => return Some(l),
            (None, None) => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_on_white_is_21() {
        assert!((contrast_ratio(Color::WHITE, Color::BLACK) - 21.0).abs() < 1e-6);
    }

    #[test]
    fn same_color_is_1() {
        let c = Color::rgb(12, 200, 99);
        assert!((contrast_ratio(c, c) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gray_777_on_white() {
        let ratio = contrast_ratio(Color::rgb(0x77, 0x77, 0x77), Color::WHITE);
        assert!((ratio - 4.48).abs() < 0.01, "ratio was {ratio}");
        assert!(ratio < 4.5);
    }

    #[test]
    fn luminance_extremes() {
        assert_eq!(relative_luminance(Color::BLACK), 0.0);
        assert!((relative_luminance(Color::WHITE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn requirement_table() {
        assert_eq!(required_ratio(false, ConformanceLevel::AA), Some(4.5));
        assert_eq!(required_ratio(true, ConformanceLevel::AA), Some(3.0));
        assert_eq!(required_ratio(false, ConformanceLevel::AAA), Some(7.0));
        assert_eq!(required_ratio(true, ConformanceLevel::AAA), Some(4.5));
        assert_eq!(required_ratio(false, ConformanceLevel::A), None);
        assert_eq!(non_text_required_ratio(), 3.0);
    }

    #[test]
    fn large_text_thresholds() {
        assert!(is_large_text(18.0, 400));
        assert!(is_large_text(14.0, 700));
        assert!(!is_large_text(14.0, 600));
        assert!(!is_large_text(17.9, 400));
    }

    #[test]
    fn shortfall_bands() {
        assert_eq!(Shortfall::classify(2.0, 4.5), Shortfall::Critical);
        assert_eq!(Shortfall::classify(3.0, 4.5), Shortfall::Serious);
        assert_eq!(Shortfall::classify(4.4, 4.5), Shortfall::Minor);
    }

    #[test]
    fn assessment_at_level_a_always_passes() {
        let a = ContrastAssessment::assess(Color::WHITE, Color::WHITE, false, ConformanceLevel::A);
        assert!(a.passes);
        assert_eq!(a.required, None);
        assert_eq!(a.shortfall, None);
    }

    #[test]
    fn failing_assessment_has_shortfall() {
        let a = ContrastAssessment::assess(
            Color::rgb(0x77, 0x77, 0x77),
            Color::WHITE,
            false,
            ConformanceLevel::AA,
        );
        assert!(!a.passes);
        assert_eq!(a.shortfall, Some(Shortfall::Minor));
    }

    #[test]
    fn suggestion_meets_requirement() {
        let fg = Color::rgb(0x77, 0x77, 0x77);
        let s = suggest_foreground(fg, Color::WHITE, 4.5).unwrap();
        assert!(contrast_ratio(s, Color::WHITE) >= 4.5);
        assert!(relative_luminance(s) < relative_luminance(fg));
    }

    #[test]
    fn passing_foreground_is_its_own_suggestion() {
        assert_eq!(
            suggest_foreground(Color::BLACK, Color::WHITE, 4.5),
            Some(Color::BLACK)
        );
    }

    #[test]
    fn impossible_requirement_has_no_suggestion() {
        let mid = Color::rgb(118, 118, 118);
        assert_eq!(suggest_foreground(Color::rgb(120, 0, 0), mid, 21.0), None);
    }
}
