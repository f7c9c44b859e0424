//! Luminance contrast checks (1.4.3, 1.4.6, 1.4.11).

use lumen_color::{
    Color, ContrastAssessment, NON_TEXT_RATIO, contrast_ratio, required_ratio, suggest_foreground,
};
use lumen_core::{ConformanceLevel, CriterionId, Finding, FindingDetail};

use crate::aria_roles::{RoleCategory, effective_role, lookup};
use crate::check::{Check, CheckError, CheckInput, CheckOutcome, Evaluation};

/// Visible text against its flattened background.
///
/// The requirement is fixed by the check's own level, so the minimum and
/// enhanced variants can both run in an AAA audit.
#[derive(Debug, Clone, Copy)]
pub struct TextContrast {
    id: &'static str,
    criterion: CriterionId,
    level: ConformanceLevel,
}

impl TextContrast {
    pub const MINIMUM_ID: &'static str = "text-contrast-minimum";
    pub const ENHANCED_ID: &'static str = "text-contrast-enhanced";

    /// 1.4.3 Contrast (Minimum), level AA.
    #[must_use]
    pub const fn minimum() -> Self {
        Self {
            id: Self::MINIMUM_ID,
            criterion: CriterionId::of(1, 4, 3),
            level: ConformanceLevel::AA,
        }
    }

    /// 1.4.6 Contrast (Enhanced), level AAA.
    #[must_use]
    pub const fn enhanced() -> Self {
        Self {
            id: Self::ENHANCED_ID,
            criterion: CriterionId::of(1, 4, 6),
            level: ConformanceLevel::AAA,
        }
    }
}

impl Check for TextContrast {
    fn id(&self) -> &'static str {
        self.id
    }

    fn criterion(&self) -> CriterionId {
        self.criterion
    }

    fn level(&self) -> ConformanceLevel {
        self.level
    }

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.is_visible() && input.context.has_text()
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let Some((fg, bg)) = input.style.text_pair() else {
            return Ok(Evaluation::NotApplicable);
        };
        let large = input.style.large_text;
        let assessment = ContrastAssessment::assess(fg, bg, large, self.level);
        let Some(required) = assessment.required else {
            return Err(CheckError::new(format!(
                "no contrast requirement defined at level {}",
                self.level
            )));
        };
        if assessment.passes {
            return Ok(CheckOutcome::pass().into());
        }
        let shortfall = assessment.shortfall.map_or("", |s| s.as_str());
        let mut finding = self
            .error(
                input.element(),
                format!(
                    "text contrast {:.2}:1 is below {required}:1 ({shortfall} shortfall)",
                    assessment.ratio
                ),
            )
            .with_details(FindingDetail::Contrast {
                foreground: fg.to_hex(),
                background: bg.to_hex(),
                ratio: assessment.ratio,
                required,
                large_text: large,
            });
        if let Some(suggested) = suggest_foreground(fg, bg, required) {
            finding = finding.with_suggestion(format!(
                "use text color {} for {:.2}:1",
                suggested.to_hex(),
                contrast_ratio(suggested, bg)
            ));
        }
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Boundary of an interactive component against its background.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonTextContrast;

impl NonTextContrast {
    pub const ID: &'static str = "non-text-contrast";
}

impl Check for NonTextContrast {
    check_identity!(Self::ID, CriterionId::of(1, 4, 11), AA);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.is_visible()
            && input.context.border.is_some()
            && effective_role(input.context)
                .and_then(|r| lookup(&r))
                .is_some_and(|spec| {
                    matches!(spec.category, RoleCategory::Widget | RoleCategory::Composite)
                })
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let Some((border, bg)) = input.style.border_pair() else {
            return Ok(Evaluation::NotApplicable);
        };
        let ratio = contrast_ratio(border, bg);
        if ratio >= NON_TEXT_RATIO {
            return Ok(CheckOutcome::pass().into());
        }
        Ok(CheckOutcome::fail(non_text_finding(self, input, border, bg, ratio)).into())
    }
}

fn non_text_finding(
    check: &NonTextContrast,
    input: &CheckInput<'_>,
    border: Color,
    bg: Color,
    ratio: f64,
) -> Finding {
    let finding = check
        .error(
            input.element(),
            format!("component boundary contrast {ratio:.2}:1 is below {NON_TEXT_RATIO}:1"),
        )
        .with_details(FindingDetail::Contrast {
            foreground: border.to_hex(),
            background: bg.to_hex(),
            ratio,
            required: NON_TEXT_RATIO,
            large_text: false,
        });
    match suggest_foreground(border, bg, NON_TEXT_RATIO) {
        Some(s) => finding.with_suggestion(format!("use border color {}", s.to_hex())),
        None => finding,
    }
}

/// Requirement for advisory color checks: the run level's text requirement,
/// falling back to AA at level A.
pub(crate) fn advisory_requirement(input: &CheckInput<'_>) -> f64 {
    let level = input.level.max(ConformanceLevel::AA);
    required_ratio(input.style.large_text, level).unwrap_or(NON_TEXT_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckOptions;
    use crate::resolve::ResolvedStyle;
    use lumen_color::ParseCache;
    use lumen_core::{ElementHandle, InspectionContext};

    fn eval(check: &dyn Check, ctx: &InspectionContext) -> Option<Evaluation> {
        let style = ResolvedStyle::resolve(ctx, &mut ParseCache::new());
        let options = CheckOptions::default();
        let input = CheckInput {
            context: ctx,
            style: &style,
            level: ConformanceLevel::AAA,
            options: &options,
        };
        check
            .applies_to(&input)
            .then(|| check.evaluate(&input).unwrap())
    }

    fn text(fg: &str) -> InspectionContext {
        InspectionContext::new(ElementHandle(1))
            .with_text("Hello")
            .with_foreground(fg)
            .with_background("#ffffff")
    }

    #[test]
    fn black_on_white_passes() {
        let e = eval(&TextContrast::minimum(), &text("#000")).unwrap();
        assert_eq!(e, Evaluation::Outcome(CheckOutcome::pass()));
    }

    #[test]
    fn gray_777_fails_minimum_with_details() {
        let Some(Evaluation::Outcome(o)) = eval(&TextContrast::minimum(), &text("#777777")) else {
            panic!("expected an outcome");
        };
        assert!(!o.passed);
        let f = &o.issues[0];
        assert_eq!(f.check, TextContrast::MINIMUM_ID);
        assert_eq!(f.criterion, CriterionId::of(1, 4, 3));
        assert!(f.suggestion.is_some());
        match &f.details {
            Some(FindingDetail::Contrast {
                ratio, required, ..
            }) => {
                assert!((ratio - 4.48).abs() < 0.01);
                assert_eq!(*required, 4.5);
            }
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn large_text_uses_lower_requirement() {
        let ctx = text("#777777").with_font(24.0, 400);
        let e = eval(&TextContrast::minimum(), &ctx).unwrap();
        assert_eq!(e, Evaluation::Outcome(CheckOutcome::pass()));
        let Some(Evaluation::Outcome(o)) = eval(&TextContrast::enhanced(), &ctx) else {
            panic!("expected an outcome");
        };
        assert!(!o.passed);
    }

    #[test]
    fn textless_and_hidden_elements_are_out_of_scope() {
        let blank = InspectionContext::new(ElementHandle(1)).with_foreground("#777");
        assert!(eval(&TextContrast::minimum(), &blank).is_none());
        assert!(eval(&TextContrast::minimum(), &text("#777").hidden()).is_none());
    }

    #[test]
    fn unparseable_color_is_not_applicable() {
        let e = eval(&TextContrast::minimum(), &text("rgb(nope)")).unwrap();
        assert_eq!(e, Evaluation::NotApplicable);
    }

    #[test]
    fn faint_button_border_fails_non_text() {
        let ctx = InspectionContext::new(ElementHandle(1))
            .with_tag("button")
            .with_border("#dddddd")
            .with_background("#ffffff");
        let Some(Evaluation::Outcome(o)) = eval(&NonTextContrast, &ctx) else {
            panic!("expected an outcome");
        };
        assert!(!o.passed);
        let ok = ctx.clone().with_border("#767676");
        assert_eq!(
            eval(&NonTextContrast, &ok),
            Some(Evaluation::Outcome(CheckOutcome::pass()))
        );
    }

    #[test]
    fn non_interactive_border_is_out_of_scope() {
        let ctx = InspectionContext::new(ElementHandle(1))
            .with_tag("div")
            .with_border("#eeeeee");
        assert!(eval(&NonTextContrast, &ctx).is_none());
    }
}
