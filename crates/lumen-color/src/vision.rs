//! Color-vision deficiency simulation and the hue-proximity heuristic.
//!
//! Simulation applies a 3x3 linear transform to normalized sRGB. Results are
//! advisory: a pair that loses contrast under a deficiency is reported as a
//! warning, never an error.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::contrast::contrast_ratio;

/// Row-major 3x3 transform applied to `[r, g, b]`.
pub type Matrix3 = [[f64; 3]; 3];

/// Default hue-proximity threshold in degrees.
pub const DEFAULT_HUE_THRESHOLD: f64 = 30.0;

/// Minimum saturation (percent) for a hue to be meaningful.
const CHROMATIC_MIN_SATURATION: f64 = 10.0;

/// Apply `matrix` to `color`, clamping channels; alpha is preserved.
#[must_use]
pub fn simulate(color: Color, matrix: &Matrix3) -> Color {
    let input = [
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0,
    ];
    let channel = |row: &[f64; 3]| {
        let v = row[0] * input[0] + row[1] * input[1] + row[2] * input[2];
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Color::rgba(
        channel(&matrix[0]),
        channel(&matrix[1]),
        channel(&matrix[2]),
        color.a,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeficiencySeverity {
    /// Missing cone type (dichromacy) or no color vision.
    Full,
    /// Shifted cone sensitivity (anomalous trichromacy).
    Partial,
}

/// Simulated color-vision deficiencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Deficiency {
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Protanomaly,
    Deuteranomaly,
    Tritanomaly,
    Achromatopsia,
}

impl Deficiency {
    pub const ALL: [Self; 7] = [
        Self::Protanopia,
        Self::Deuteranopia,
        Self::Tritanopia,
        Self::Protanomaly,
        Self::Deuteranomaly,
        Self::Tritanomaly,
        Self::Achromatopsia,
    ];

    #[must_use]
    pub const fn matrix(self) -> &'static Matrix3 {
        match self {
            Self::Protanopia => &[
                [0.567, 0.433, 0.0],
                [0.558, 0.442, 0.0],
                [0.0, 0.242, 0.758],
            ],
            Self::Deuteranopia => &[[0.625, 0.375, 0.0], [0.7, 0.3, 0.0], [0.0, 0.3, 0.7]],
            Self::Tritanopia => &[
                [0.95, 0.05, 0.0],
                [0.0, 0.433, 0.567],
                [0.0, 0.475, 0.525],
            ],
            Self::Protanomaly => &[
                [0.817, 0.183, 0.0],
                [0.333, 0.667, 0.0],
                [0.0, 0.125, 0.875],
            ],
            Self::Deuteranomaly => &[[0.8, 0.2, 0.0], [0.258, 0.742, 0.0], [0.0, 0.142, 0.858]],
            Self::Tritanomaly => &[
                [0.967, 0.033, 0.0],
                [0.0, 0.733, 0.267],
                [0.0, 0.183, 0.817],
            ],
            Self::Achromatopsia => &[
                [0.299, 0.587, 0.114],
                [0.299, 0.587, 0.114],
                [0.299, 0.587, 0.114],
            ],
        }
    }

    #[must_use]
    pub const fn severity(self) -> DeficiencySeverity {
        match self {
            Self::Protanomaly | Self::Deuteranomaly | Self::Tritanomaly => {
                DeficiencySeverity::Partial
            }
            _ => DeficiencySeverity::Full,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
            Self::Protanomaly => "protanomaly",
            Self::Deuteranomaly => "deuteranomaly",
            Self::Tritanomaly => "tritanomaly",
            Self::Achromatopsia => "achromatopsia",
        }
    }
}

impl fmt::Display for Deficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDeficiency(pub String);

impl fmt::Display for UnknownDeficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color-vision deficiency: {}", self.0)
    }
}

impl std::error::Error for UnknownDeficiency {}

impl FromStr for Deficiency {
    type Err = UnknownDeficiency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownDeficiency(needle.to_string()))
    }
}

/// Contrast of a pair after both colors pass through a deficiency transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeficiencyVisibility {
    pub deficiency: Deficiency,
    pub simulated_ratio: f64,
    pub still_meets_requirement: bool,
}

#[must_use]
pub fn check_visibility_under_deficiency(
    foreground: Color,
    background: Color,
    deficiency: Deficiency,
    required: f64,
) -> DeficiencyVisibility {
    let matrix = deficiency.matrix();
    let simulated_ratio =
        contrast_ratio(simulate(foreground, matrix), simulate(background, matrix));
    DeficiencyVisibility {
        deficiency,
        simulated_ratio,
        still_meets_requirement: simulated_ratio >= required,
    }
}

/// Circular hue distance in degrees, `0.0..=180.0`.
#[must_use]
pub fn hue_difference(a: Color, b: Color) -> f64 {
    let d = (a.to_hsl().h - b.to_hsl().h).abs() % 360.0;
    if d > 180.0 { 360.0 - d } else { d }
}

/// Whether the color carries a meaningful hue (not near gray, black or white).
#[must_use]
pub fn is_chromatic(color: Color) -> bool {
    let hsl = color.to_hsl();
    hsl.s >= CHROMATIC_MIN_SATURATION && hsl.l > 5.0 && hsl.l < 95.0
}

/// Both colors are chromatic and their hues sit closer than `threshold`.
#[must_use]
pub fn hue_too_similar(a: Color, b: Color, threshold: f64) -> bool {
    is_chromatic(a) && is_chromatic(b) && hue_difference(a, b) < threshold
}
