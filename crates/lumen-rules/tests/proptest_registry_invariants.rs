//! Property-based invariant tests for the rule registry and built-in checks.
//!
//! 1. Check sets are nested: A ⊆ AA ⊆ AAA, in registration order.
//! 2. A principle filter only ever narrows the level's check set.
//! 3. Built-in checks never panic on arbitrary element contexts.
//! 4. `passed` is true exactly when an outcome carries no issues.
//! 5. Every finding is attributed to the check and criterion that produced it.
//! 6. Issues are errors and warnings are warnings.
//! 7. Evaluation is deterministic for identical input.
//! 8. Text contrast passes exactly when the opaque pair meets its requirement.

use lumen_color::{Color, ParseCache, contrast_ratio, required_ratio};
use lumen_core::{
    ConformanceLevel, ElementHandle, InspectionContext, Principle, Severity,
};
use lumen_rules::checks::TextContrast;
use lumen_rules::{Check, CheckInput, CheckOptions, Evaluation, ResolvedStyle, RuleRegistry};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn level_strategy() -> impl Strategy<Value = ConformanceLevel> {
    proptest::sample::select(ConformanceLevel::ALL.to_vec())
}

fn color_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(r, g, b)| format!("#{r:02x}{g:02x}{b:02x}")),
        (any::<u8>(), any::<u8>(), any::<u8>(), 0.0f32..=1.0)
            .prop_map(|(r, g, b, a)| format!("rgba({r}, {g}, {b}, {a})")),
        Just("transparent".to_string()),
        Just("navy".to_string()),
        "[ -~]{0,12}",
    ]
}

fn context_strategy() -> impl Strategy<Value = InspectionContext> {
    let tags = proptest::sample::select(vec![
        "div", "a", "button", "img", "input", "h1", "h3", "html", "label", "span",
    ]);
    let roles = proptest::sample::select(vec![
        "", "button", "link", "slider", "checkbox", "heading", "widget", "bogus", "alert",
        "presentation", "combobox",
    ]);
    let attr_names = proptest::sample::select(vec![
        "aria-checked",
        "aria-level",
        "aria-valuenow",
        "aria-valuemin",
        "aria-valuemax",
        "aria-live",
        "aria-relevant",
        "aria-hidden",
        "aria-bogus",
        "alt",
        "lang",
        "tabindex",
        "aria-labelledby",
    ]);
    (
        tags,
        proptest::option::of(roles),
        proptest::option::of(color_text()),
        proptest::collection::vec(color_text(), 0..3),
        proptest::option::of(color_text()),
        proptest::option::of("[ -~]{0,16}"),
        proptest::option::of("[ -~]{0,16}"),
        proptest::collection::vec((attr_names, "[ -~]{0,8}"), 0..4),
        (4.0f32..40.0, 100u16..=900),
        any::<bool>(),
    )
        .prop_map(
            |(tag, role, fg, bgs, border, text, name, attrs, (size, weight), hidden)| {
                let mut ctx = InspectionContext::new(ElementHandle(1)).with_tag(tag);
                if let Some(role) = role {
                    ctx = ctx.with_role(role);
                }
                if let Some(fg) = fg {
                    ctx = ctx.with_foreground(fg);
                }
                for bg in bgs {
                    ctx = ctx.with_background(bg);
                }
                if let Some(border) = border {
                    ctx = ctx.with_border(border);
                }
                if let Some(text) = text {
                    ctx = ctx.with_text(text);
                }
                if let Some(name) = name {
                    ctx = ctx.with_accessible_name(name);
                }
                for (k, v) in attrs {
                    ctx = ctx.with_attribute(k, v);
                }
                ctx = ctx.with_font(size, weight);
                if hidden { ctx.hidden() } else { ctx }
            },
        )
}

fn evaluate_all(
    registry: &RuleRegistry,
    ctx: &InspectionContext,
    level: ConformanceLevel,
) -> Vec<(&'static str, Option<Evaluation>)> {
    let style = ResolvedStyle::resolve(ctx, &mut ParseCache::new());
    let options = CheckOptions::default();
    let input = CheckInput {
        context: ctx,
        style: &style,
        level,
        options: &options,
    };
    registry
        .checks_for_level(level)
        .into_iter()
        .map(|check| {
            let result = check
                .applies_to(&input)
                .then(|| check.evaluate(&input).ok())
                .flatten();
            (check.id(), result)
        })
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Registry shape
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn level_sets_are_nested() {
    let registry = RuleRegistry::wcag21().expect("built-in registry");
    let ids = |level| {
        registry
            .checks_for_level(level)
            .iter()
            .map(|c| c.id())
            .collect::<Vec<_>>()
    };
    let a = ids(ConformanceLevel::A);
    let aa = ids(ConformanceLevel::AA);
    let aaa = ids(ConformanceLevel::AAA);
    assert!(a.len() < aa.len() && aa.len() < aaa.len());
    // Order is a subsequence of the larger set's order.
    let mut it = aa.iter();
    assert!(a.iter().all(|id| it.any(|x| x == id)));
    let mut it = aaa.iter();
    assert!(aa.iter().all(|id| it.any(|x| x == id)));
}

proptest! {
    #[test]
    fn principle_filter_narrows(
        level in level_strategy(),
        picks in proptest::sample::subsequence(Principle::ALL.to_vec(), 0..=4),
    ) {
        let registry = RuleRegistry::wcag21().expect("built-in registry");
        let all: Vec<&str> = registry.checks_for_level(level).iter().map(|c| c.id()).collect();
        let some: Vec<&str> = registry
            .checks_for(level, Some(picks.as_slice()))
            .iter()
            .map(|c| c.id())
            .collect();
        prop_assert!(some.iter().all(|id| all.contains(id)));
        for check in registry.checks_for(level, Some(picks.as_slice())) {
            prop_assert!(picks.contains(&check.criterion().principle()));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-7. Check outcomes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn checks_are_total_and_well_attributed(
        ctx in context_strategy(),
        level in level_strategy(),
    ) {
        let registry = RuleRegistry::wcag21().expect("built-in registry");
        for (id, result) in evaluate_all(&registry, &ctx, level) {
            let Some(Evaluation::Outcome(outcome)) = result else { continue };
            let check = registry.checks().find(|c| c.id() == id).expect("registered");
            prop_assert_eq!(outcome.passed, outcome.issues.is_empty());
            for finding in outcome.issues.iter().chain(&outcome.warnings) {
                prop_assert_eq!(finding.check.as_str(), id);
                prop_assert_eq!(finding.criterion, check.criterion());
                prop_assert_eq!(finding.element, ctx.element);
            }
            prop_assert!(outcome.issues.iter().all(|f| f.severity == Severity::Error));
            prop_assert!(outcome.warnings.iter().all(|f| f.severity == Severity::Warning));
        }
    }

    #[test]
    fn evaluation_is_deterministic(ctx in context_strategy(), level in level_strategy()) {
        let registry = RuleRegistry::wcag21().expect("built-in registry");
        prop_assert_eq!(
            evaluate_all(&registry, &ctx, level),
            evaluate_all(&registry, &ctx, level)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Contrast agreement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn text_contrast_matches_ratio(
        (fr, fg_, fb) in (any::<u8>(), any::<u8>(), any::<u8>()),
        (br, bg_, bb) in (any::<u8>(), any::<u8>(), any::<u8>()),
        large in any::<bool>(),
    ) {
        let fg = Color::rgb(fr, fg_, fb);
        let bg = Color::rgb(br, bg_, bb);
        let size = if large { 24.0 } else { 12.0 };
        let ctx = InspectionContext::new(ElementHandle(7))
            .with_text("sample")
            .with_foreground(fg.to_hex())
            .with_background(bg.to_hex())
            .with_font(size, 400);
        let style = ResolvedStyle::resolve(&ctx, &mut ParseCache::new());
        let options = CheckOptions::default();
        let input = CheckInput {
            context: &ctx,
            style: &style,
            level: ConformanceLevel::AA,
            options: &options,
        };
        let check = TextContrast::minimum();
        let Ok(Evaluation::Outcome(outcome)) = check.evaluate(&input) else {
            return Err(TestCaseError::fail("opaque pair must evaluate"));
        };
        let required = required_ratio(large, ConformanceLevel::AA).expect("AA has a requirement");
        prop_assert_eq!(outcome.passed, contrast_ratio(fg, bg) >= required);
    }
}
