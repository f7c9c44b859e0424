//! Advisory color-vision checks (1.4.1 Use of Color).
//!
//! Both checks only warn and only run when deficiency simulation is enabled.

use lumen_color::{
    check_visibility_under_deficiency, contrast_ratio, hue_difference, hue_too_similar,
};
use lumen_core::{ConformanceLevel, CriterionId, FindingDetail};

use crate::check::{Check, CheckError, CheckInput, CheckOutcome, Evaluation};
use crate::checks::contrast::advisory_requirement;

const USE_OF_COLOR: CriterionId = CriterionId::of(1, 4, 1);

fn simulated_text(input: &CheckInput<'_>) -> bool {
    input.options.deficiency_simulation_enabled
        && input.context.is_visible()
        && input.context.has_text()
}

/// Text that meets its contrast requirement normally but not under a
/// simulated deficiency.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorVisionVisibility;

impl ColorVisionVisibility {
    pub const ID: &'static str = "color-vision-visibility";
}

impl Check for ColorVisionVisibility {
    check_identity!(Self::ID, USE_OF_COLOR, A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        simulated_text(input)
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let Some((fg, bg)) = input.style.text_pair() else {
            return Ok(Evaluation::NotApplicable);
        };
        let required = advisory_requirement(input);
        // Pairs already failing plain contrast are reported by the contrast checks.
        if contrast_ratio(fg, bg) < required {
            return Ok(CheckOutcome::pass().into());
        }
        let warnings = input
            .options
            .deficiencies
            .iter()
            .map(|&d| check_visibility_under_deficiency(fg, bg, d, required))
            .filter(|v| !v.still_meets_requirement)
            .map(|v| {
                self.warning(
                    input.element(),
                    format!(
                        "contrast drops to {:.2}:1 under {}",
                        v.simulated_ratio, v.deficiency
                    ),
                )
                .with_suggestion(
                    "do not rely on color alone; add an underline, icon or weight change",
                )
                .with_details(FindingDetail::Deficiency {
                    deficiency: v.deficiency.name().to_string(),
                    simulated_ratio: v.simulated_ratio,
                    required,
                })
            });
        Ok(CheckOutcome::pass().with_warnings(warnings).into())
    }
}

/// Chromatic text and background whose hues are too close to tell apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct HueProximity;

impl HueProximity {
    pub const ID: &'static str = "hue-proximity";
}

impl Check for HueProximity {
    check_identity!(Self::ID, USE_OF_COLOR, A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        simulated_text(input)
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let Some((fg, bg)) = input.style.text_pair() else {
            return Ok(Evaluation::NotApplicable);
        };
        let threshold = input.options.hue_threshold;
        if !hue_too_similar(fg, bg, threshold) {
            return Ok(CheckOutcome::pass().into());
        }
        let delta = hue_difference(fg, bg);
        let warning = self
            .warning(
                input.element(),
                format!("text and background hues are only {delta:.0} degrees apart"),
            )
            .with_details(FindingDetail::HueProximity {
                foreground: fg.to_hex(),
                background: bg.to_hex(),
                hue_delta: delta,
                threshold,
            });
        Ok(CheckOutcome::pass().with_warning(warning).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckOptions;
    use crate::resolve::ResolvedStyle;
    use lumen_color::ParseCache;
    use lumen_core::{ElementHandle, InspectionContext, Severity};

    fn run(
        check: &dyn Check,
        ctx: &InspectionContext,
        options: &CheckOptions,
    ) -> Option<CheckOutcome> {
        let style = ResolvedStyle::resolve(ctx, &mut ParseCache::new());
        let input = CheckInput {
            context: ctx,
            style: &style,
            level: ConformanceLevel::AA,
            options,
        };
        if !check.applies_to(&input) {
            return None;
        }
        match check.evaluate(&input).unwrap() {
            Evaluation::Outcome(o) => Some(o),
            Evaluation::NotApplicable => None,
        }
    }

    fn text(fg: &str, bg: &str) -> InspectionContext {
        InspectionContext::new(ElementHandle(9))
            .with_text("Go")
            .with_foreground(fg)
            .with_background(bg)
    }

    #[test]
    fn lime_on_maroon_warns_for_red_green_deficiencies() {
        let o = run(&ColorVisionVisibility, &text("#00ff00", "#800000"), &CheckOptions::default())
            .unwrap();
        assert!(o.passed);
        assert!(o.issues.is_empty());
        assert!(!o.warnings.is_empty());
        assert!(o.warnings.iter().all(|w| w.severity == Severity::Warning));
        assert!(o.warnings.iter().any(|w| matches!(
            &w.details,
            Some(FindingDetail::Deficiency { deficiency, .. }) if deficiency == "protanopia"
        )));
    }

    #[test]
    fn black_on_white_has_no_warnings() {
        let o = run(&ColorVisionVisibility, &text("#000", "#fff"), &CheckOptions::default())
            .unwrap();
        assert!(o.warnings.is_empty());
    }

    #[test]
    fn disabled_simulation_skips_both_checks() {
        let options = CheckOptions {
            deficiency_simulation_enabled: false,
            ..CheckOptions::default()
        };
        let ctx = text("#00ff00", "#800000");
        assert!(run(&ColorVisionVisibility, &ctx, &options).is_none());
        assert!(run(&HueProximity, &ctx, &options).is_none());
    }

    #[test]
    fn close_hues_warn() {
        let o = run(&HueProximity, &text("#dc1414", "#dc5014"), &CheckOptions::default()).unwrap();
        assert!(o.passed);
        assert_eq!(o.warnings.len(), 1);
        assert_eq!(o.warnings[0].check, HueProximity::ID);
    }

    #[test]
    fn grayscale_pair_never_warns_on_hue() {
        let o = run(&HueProximity, &text("#333", "#eee"), &CheckOptions::default()).unwrap();
        assert!(o.warnings.is_empty());
    }
}
