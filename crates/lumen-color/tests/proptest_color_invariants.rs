//! Property-based invariant tests for lumen-color.
//!
//! These tests verify invariants that must hold for **any** color input:
//!
//! 1. Contrast ratio is symmetric.
//! 2. Contrast ratio always lies in `[1, 21]`.
//! 3. A color against itself has ratio 1.
//! 4. Compositing an opaque foreground returns it unchanged.
//! 5. Compositing never yields less alpha than either input.
//! 6. `flatten` always yields an opaque color.
//! 7. RGB -> HSL -> RGB is exact within one unit per channel.
//! 8. HSL -> RGB -> HSL keeps lightness within one unit and saturation within
//!    the 8-bit quantization bound; with `19 <= l <= 81` and chroma at least
//!    `Hsl::STABLE_CHROMA`, every component stays within one unit.
//! 9. Hex formatting parses back to the same color.
//! 10. Parsing is total: arbitrary strings never panic.
//! 11. The parse cache agrees with the uncached parser.
//! 12. Deficiency simulation preserves alpha and stays in range of contrast math.
//! 13. Hue difference lies in `[0, 180]` and is symmetric.

use lumen_color::{
    Color, Deficiency, Hsl, ParseCache, composite, contrast_ratio, flatten, hue_difference,
    parse, simulate,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn opaque_strategy() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Color::rgb(r, g, b))
}

fn color_strategy() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>(), 0u8..=255)
        .prop_map(|(r, g, b, a)| Color::rgba(r, g, b, f32::from(a) / 255.0))
}

fn deficiency_strategy() -> impl Strategy<Value = Deficiency> {
    proptest::sample::select(Deficiency::ALL.to_vec())
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Contrast ratio bounds and symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn contrast_is_symmetric(a in opaque_strategy(), b in opaque_strategy()) {
        prop_assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    #[test]
    fn contrast_is_bounded(a in opaque_strategy(), b in opaque_strategy()) {
        let ratio = contrast_ratio(a, b);
        prop_assert!((1.0..=21.0).contains(&ratio), "ratio {} out of bounds", ratio);
    }

    #[test]
    fn self_contrast_is_one(a in opaque_strategy()) {
        prop_assert!((contrast_ratio(a, a) - 1.0).abs() < 1e-12);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-6. Compositing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn opaque_foreground_is_unchanged(fg in opaque_strategy(), bg in color_strategy()) {
        prop_assert_eq!(composite(fg, bg), fg);
    }

    #[test]
    fn composite_alpha_is_monotonic(fg in color_strategy(), bg in color_strategy()) {
        let out = composite(fg, bg);
        prop_assert!(out.a + 1e-6 >= fg.a);
        prop_assert!(out.a + 1e-6 >= bg.a);
    }

    #[test]
    fn flatten_is_opaque(layers in proptest::collection::vec(color_strategy(), 0..6)) {
        prop_assert!(flatten(layers).is_opaque());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7-8. HSL round trips
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rgb_hsl_rgb_round_trip(c in opaque_strategy()) {
        let back = Color::from_hsl(c.to_hsl(), 1.0);
        prop_assert!(back.r.abs_diff(c.r) <= 1);
        prop_assert!(back.g.abs_diff(c.g) <= 1);
        prop_assert!(back.b.abs_diff(c.b) <= 1);
    }

    #[test]
    fn hsl_lightness_and_saturation_stay_bounded(h in 0u16..360, s in 0u8..=100, l in 1u8..=99) {
        let hsl = Hsl::new(f64::from(h), f64::from(s), f64::from(l));
        let back = Color::from_hsl(hsl, 1.0).to_hsl();
        prop_assert!((back.l - hsl.l).abs() <= 1.0);
        let headroom = 1.0 - (2.0 * hsl.l / 100.0 - 1.0).abs();
        let bound = (100.0 / 255.0) / headroom;
        prop_assert!(
            (back.s - hsl.s).abs() <= bound + 1e-9,
            "saturation drifted by {} (bound {})",
            (back.s - hsl.s).abs(),
            bound
        );
    }

    #[test]
    fn hsl_rgb_hsl_round_trip_on_stable_domain(h in 0u16..360, s in 0u8..=100, l in 19u8..=81) {
        let hsl = Hsl::new(f64::from(h), f64::from(s), f64::from(l));
        prop_assume!(hsl.chroma() >= Hsl::STABLE_CHROMA);
        let back = Color::from_hsl(hsl, 1.0).to_hsl();
        let dh = (back.h - hsl.h).abs() % 360.0;
        let dh = dh.min(360.0 - dh);
        prop_assert!(dh <= 1.0, "hue drifted by {}", dh);
        prop_assert!((back.s - hsl.s).abs() <= 1.0);
        prop_assert!((back.l - hsl.l).abs() <= 1.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9-11. Parsing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hex_round_trip(c in opaque_strategy()) {
        prop_assert_eq!(parse(&c.to_hex()), Ok(c));
    }

    #[test]
    fn parse_never_panics(s in ".{0,40}") {
        let _ = parse(&s);
    }

    #[test]
    fn cache_agrees_with_parser(inputs in proptest::collection::vec(
        prop_oneof![
            Just("#fff".to_string()),
            Just("rgb(1 2 3)".to_string()),
            Just("navy".to_string()),
            Just("bogus".to_string()),
            "[a-z#0-9(), ]{0,12}",
        ],
        1..20,
    )) {
        let mut cache = ParseCache::with_capacity(4);
        for input in &inputs {
            prop_assert_eq!(cache.parse(input), parse(input));
        }
        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, inputs.len() as u64);
        prop_assert!(stats.size <= stats.capacity);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 12-13. Vision
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn simulation_preserves_alpha(c in color_strategy(), d in deficiency_strategy()) {
        let out = simulate(c, d.matrix());
        prop_assert_eq!(out.a, c.a);
        let ratio = contrast_ratio(out, Color::WHITE);
        prop_assert!((1.0..=21.0).contains(&ratio));
    }

    #[test]
    fn hue_difference_is_symmetric_and_bounded(a in opaque_strategy(), b in opaque_strategy()) {
        let d = hue_difference(a, b);
        prop_assert!((0.0..=180.0).contains(&d));
        prop_assert!((d - hue_difference(b, a)).abs() < 1e-9);
    }
}
