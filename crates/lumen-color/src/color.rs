use std::fmt;

/// sRGB color with straight (non-premultiplied) alpha.
///
/// Two colors are equal iff every channel is equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Alpha is clamped into `0.0..=1.0`; NaN becomes fully transparent.
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        Self { r, g, b, a }
    }

    #[inline]
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    #[inline]
    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    /// Same channels, fully opaque.
    #[must_use]
    pub const fn opaque(self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let a = (self.a * 255.0).round() as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a)
        }
    }

    /// Alpha-over this color onto `background`.
    #[must_use]
    pub fn over(self, background: Self) -> Self {
        composite(self, background)
    }

    /// Convert to HSL.
    ///
    /// Achromatic colors report hue 0 and saturation 0. See [`Hsl`] for how
    /// closely [`from_hsl`](Self::from_hsl) followed by this recovers the input.
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let chroma = max - min;
        if chroma == 0.0 {
            return Hsl::new(0.0, 0.0, l * 100.0);
        }
        let s = chroma / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / chroma).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / chroma + 2.0)
        } else {
            60.0 * ((r - g) / chroma + 4.0)
        };
        Hsl::new(h, s * 100.0, l * 100.0)
    }

    /// Build a color from HSL components and an alpha.
    ///
    /// Channels are rounded to `u8`, so the trip back through
    /// [`to_hsl`](Self::to_hsl) is only as exact as [`Hsl`] documents.
    #[must_use]
    pub fn from_hsl(hsl: Hsl, alpha: f32) -> Self {
        let h = hsl.h.rem_euclid(360.0);
        let s = (hsl.s / 100.0).clamp(0.0, 1.0);
        let l = (hsl.l / 100.0).clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h_prime = h / 60.0;
        let x = chroma * (1.0 - (h_prime.rem_euclid(2.0) - 1.0).abs());
        let (r1, g1, b1) = match h_prime as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgba(to_u8(r1), to_u8(g1), to_u8(b1), alpha)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hue (0-360), saturation (0-100), lightness (0-100).
///
/// # Round trip through 8-bit RGB
///
/// For whole-number `h` in `0..360` and `s`, `l` in `0..=100`, converting to
/// [`Color`] and back gives:
///
/// | Component | Bound |
/// |-----------|-------|
/// | lightness | within 1 everywhere |
/// | saturation | `(100 / 255) / (1 - abs(2l - 1))` for `0 < l < 100`; 1 for `19 <= l <= 81` |
/// | hue | within 1 (circular) when [`chroma`](Self::chroma) `>=` [`Hsl::STABLE_CHROMA`] |
///
/// Below that chroma the hue is undefined once the channels quantize to a
/// gray, and comes back as 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Smallest chroma, in percent, at which hue survives an RGB round trip
    /// within one degree.
    pub const STABLE_CHROMA: f64 = 23.0;

    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Chroma in percent: `(1 - |2l - 1|) * s`.
    #[must_use]
    pub fn chroma(self) -> f64 {
        let l = (self.l / 100.0).clamp(0.0, 1.0);
        (1.0 - (2.0 * l - 1.0).abs()) * self.s.clamp(0.0, 100.0)
    }

    /// Components rounded to whole units, hue wrapped into `0..360`.
    #[must_use]
    pub fn rounded(self) -> (u16, u8, u8) {
        let h = self.h.round().rem_euclid(360.0) as u16;
        (
            h,
            self.s.round().clamp(0.0, 100.0) as u8,
            self.l.round().clamp(0.0, 100.0) as u8,
        )
    }
}

/// Standard alpha-over compositing of `foreground` onto `background`.
///
/// An opaque foreground is returned unchanged, as is the background under a
/// fully transparent foreground.
#[must_use]
pub fn composite(foreground: Color, background: Color) -> Color {
    if foreground.is_opaque() {
        return foreground;
    }
    if foreground.is_transparent() {
        return background;
    }
    let fa = f64::from(foreground.a);
    let ba = f64::from(background.a);
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= 0.0 {
        return Color::TRANSPARENT;
    }
    let mix = |f: u8, b: u8| {
        let v = (f64::from(f) * fa + f64::from(b) * ba * (1.0 - fa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Color::rgba(
        mix(foreground.r, background.r),
        mix(foreground.g, background.g),
        mix(foreground.b, background.b),
        out_a as f32,
    )
}

/// Resolve the effective color of a stack of layers.
///
/// `layers` runs from the element outward through its ancestors. Layers are
/// composited until the result is fully opaque; a stack that never reaches
/// full opacity is composited over the root default, opaque white.
#[must_use]
pub fn flatten<I>(layers: I) -> Color
where
    I: IntoIterator<Item = Color>,
{
    let mut acc = Color::TRANSPARENT;
    for layer in layers {
        acc = under(acc, layer);
        if acc.is_opaque() {
            return acc;
        }
    }
    under(acc, Color::WHITE)
}

/// Composite an accumulated front stack over one more layer behind it.
fn under(front: Color, behind: Color) -> Color {
    if front.is_transparent() {
        behind
    } else {
        composite(front, behind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_foreground_wins() {
        let fg = Color::rgb(10, 20, 30);
        assert_eq!(composite(fg, Color::rgba(200, 0, 0, 0.3)), fg);
    }

    #[test]
    fn transparent_foreground_yields_background() {
        let bg = Color::rgba(1, 2, 3, 0.4);
        assert_eq!(composite(Color::rgba(9, 9, 9, 0.0), bg), bg);
    }

    #[test]
    fn half_black_over_white_is_mid_gray() {
        let c = composite(Color::rgba(0, 0, 0, 0.5), Color::WHITE);
        assert_eq!(c, Color::rgb(128, 128, 128));
    }

    #[test]
    fn flatten_stops_at_first_opaque_layer() {
        let layers = [
            Color::rgba(255, 0, 0, 0.5),
            Color::rgb(0, 0, 255),
            Color::rgb(0, 255, 0),
        ];
        let c = flatten(layers);
        assert!(c.is_opaque());
        assert_eq!((c.r, c.g, c.b), (128, 0, 128));
    }

    #[test]
    fn flatten_falls_back_to_white() {
        assert_eq!(flatten([]), Color::WHITE);
        assert_eq!(flatten([Color::TRANSPARENT]), Color::WHITE);
        let c = flatten([Color::rgba(0, 0, 0, 0.5)]);
        assert_eq!(c, Color::rgb(128, 128, 128));
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Color::rgb(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(Color::rgba(0, 0, 0, 0.5).to_hex(), "#00000080");
    }

    #[test]
    fn near_gray_hsl_loses_hue_but_keeps_lightness() {
        let c = Color::from_hsl(Hsl::new(180.0, 1.0, 1.0), 1.0);
        assert_eq!((c.r, c.g, c.b), (3, 3, 3));
        let back = c.to_hsl();
        assert_eq!((back.h, back.s), (0.0, 0.0));
        assert!((back.l - 1.0).abs() <= 1.0);
    }

    #[test]
    fn chroma_peaks_at_mid_lightness() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).chroma(), 100.0);
        assert_eq!(Hsl::new(0.0, 100.0, 0.0).chroma(), 0.0);
        assert_eq!(Hsl::new(0.0, 50.0, 25.0).chroma(), 25.0);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::rgb(255, 0, 0).to_hsl().rounded(), (0, 100, 50));
        assert_eq!(Color::rgb(0, 255, 0).to_hsl().rounded(), (120, 100, 50));
        assert_eq!(Color::rgb(0, 0, 255).to_hsl().rounded(), (240, 100, 50));
        assert_eq!(Color::WHITE.to_hsl().rounded(), (0, 0, 100));
    }

    #[test]
    fn hsl_to_rgb_known_values() {
        assert_eq!(
            Color::from_hsl(Hsl::new(120.0, 100.0, 25.0), 1.0),
            Color::rgb(0, 128, 0)
        );
        assert_eq!(
            Color::from_hsl(Hsl::new(360.0, 100.0, 50.0), 1.0),
            Color::rgb(255, 0, 0)
        );
    }

    #[test]
    fn rgba_clamps_alpha() {
        assert_eq!(Color::rgba(0, 0, 0, 3.0).a, 1.0);
        assert_eq!(Color::rgba(0, 0, 0, -1.0).a, 0.0);
        assert_eq!(Color::rgba(0, 0, 0, f32::NAN).a, 0.0);
    }
}
