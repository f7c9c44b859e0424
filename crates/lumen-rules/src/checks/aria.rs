//! ARIA correctness checks (4.1.1, 4.1.2, 4.1.3).

use lumen_core::{ConformanceLevel, CriterionId, Finding, FindingDetail};

use crate::aria_roles::{
    AttributeKind, LIVE_TOKENS, RELEVANT_TOKENS, RoleCategory, attribute_kind, effective_role,
    lookup,
};
use crate::check::{Check, CheckError, CheckInput, CheckOutcome, Evaluation};

const PARSING: CriterionId = CriterionId::of(4, 1, 1);
const NAME_ROLE_VALUE: CriterionId = CriterionId::of(4, 1, 2);
const STATUS_MESSAGES: CriterionId = CriterionId::of(4, 1, 3);

fn attribute_detail(name: &str, value: Option<&str>) -> FindingDetail {
    FindingDetail::Attribute {
        name: name.to_string(),
        value: value.map(str::to_string),
    }
}

/// Declared roles must exist and must not be abstract.
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaRole;

impl AriaRole {
    pub const ID: &'static str = "aria-role";
}

impl Check for AriaRole {
    check_identity!(Self::ID, NAME_ROLE_VALUE, A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.role.is_some()
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let declared = input.context.role.as_deref().unwrap_or_default();
        let Some(first) = declared.split_whitespace().next() else {
            let finding = self
                .error(input.element(), "role attribute is empty".to_string())
                .with_details(attribute_detail("role", Some(declared)));
            return Ok(CheckOutcome::fail(finding).into());
        };
        let message = match lookup(first) {
            Some(spec) if spec.category != RoleCategory::Abstract => {
                return Ok(CheckOutcome::pass().into());
            }
            Some(_) => format!("role \"{first}\" is abstract and may not be used in content"),
            None => format!("role \"{first}\" is not a known ARIA role"),
        };
        let finding = self
            .error(input.element(), message)
            .with_details(attribute_detail("role", Some(declared)));
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Every state or property a role requires is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaRequiredProperties;

impl AriaRequiredProperties {
    pub const ID: &'static str = "aria-required-properties";
}

impl Check for AriaRequiredProperties {
    check_identity!(Self::ID, NAME_ROLE_VALUE, A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        effective_role(input.context)
            .and_then(|r| lookup(&r))
            .is_some_and(|spec| !spec.required.is_empty())
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let role = effective_role(input.context).unwrap_or_default();
        let Some(spec) = lookup(&role) else {
            return Err(CheckError::new(format!("role \"{role}\" vanished between calls")));
        };
        let issues = spec
            .required
            .iter()
            .filter(|attr| input.context.attribute(attr).is_none())
            .map(|attr| {
                self.error(
                    input.element(),
                    format!("role \"{}\" requires {attr}", spec.name),
                )
                .with_suggestion(format!("add {attr} to the element"))
                .with_details(attribute_detail(attr, None))
            })
            .collect();
        Ok(CheckOutcome::from_issues(issues).into())
    }
}

/// `aria-*` values belong to their attribute's value domain.
///
/// `aria-live` and `aria-relevant` are left to [`LiveRegion`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AriaAttributeValues;

impl AriaAttributeValues {
    pub const ID: &'static str = "aria-attribute-values";

    fn range_issue(&self, input: &CheckInput<'_>) -> Option<Finding> {
        let num = |name| {
            input
                .context
                .attribute(name)
                .and_then(|v| v.trim().parse::<f64>().ok())
        };
        let now = num("aria-valuenow")?;
        let min = num("aria-valuemin").unwrap_or(f64::NEG_INFINITY);
        let max = num("aria-valuemax").unwrap_or(f64::INFINITY);
        if min > max {
            return Some(self.error(
                input.element(),
                format!("aria-valuemin {min} exceeds aria-valuemax {max}"),
            ));
        }
        (now < min || now > max).then(|| {
            self.error(
                input.element(),
                format!("aria-valuenow {now} lies outside the declared range"),
            )
            .with_details(attribute_detail(
                "aria-valuenow",
                input.context.attribute("aria-valuenow"),
            ))
        })
    }
}

impl Check for AriaAttributeValues {
    check_identity!(Self::ID, NAME_ROLE_VALUE, A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input
            .context
            .aria_attributes()
            .any(|(name, _)| !is_live_attribute(name))
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let mut issues = Vec::new();
        for (name, value) in input.context.aria_attributes() {
            if is_live_attribute(name) {
                continue;
            }
            let message = match attribute_kind(name) {
                None => format!("{name} is not a known ARIA attribute"),
                Some(kind) if !kind.accepts(value) => {
                    format!("{name}=\"{value}\" must be {}", kind.describe())
                }
                Some(_) => continue,
            };
            issues.push(
                self.error(input.element(), message)
                    .with_details(attribute_detail(name, Some(value))),
            );
        }
        issues.extend(self.range_issue(input));
        Ok(CheckOutcome::from_issues(issues).into())
    }
}

fn is_live_attribute(name: &str) -> bool {
    matches!(name, "aria-live" | "aria-relevant")
}

/// Interactive roles expose an accessible name.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveName;

impl InteractiveName {
    pub const ID: &'static str = "interactive-name";
}

impl Check for InteractiveName {
    check_identity!(Self::ID, NAME_ROLE_VALUE, A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.is_visible()
            && effective_role(input.context)
                .and_then(|r| lookup(&r))
                .is_some_and(|spec| {
                    spec.needs_name
                        && matches!(
                            spec.category,
                            RoleCategory::Widget | RoleCategory::Composite | RoleCategory::Window
                        )
                })
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let ctx = input.context;
        let role = effective_role(ctx).unwrap_or_default();
        let from_content = lookup(&role).is_some_and(|s| s.name_from_content) && ctx.has_text();
        if ctx.name().is_some() || from_content {
            return Ok(CheckOutcome::pass().into());
        }
        let finding = self
            .error(
                input.element(),
                format!("{role} has no accessible name"),
            )
            .with_suggestion("add visible text, aria-label or aria-labelledby");
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Id references resolve to elements in the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdReferences;

impl IdReferences {
    pub const ID: &'static str = "id-references";
}

impl Check for IdReferences {
    check_identity!(Self::ID, PARSING, A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        !input.context.id_references.is_empty()
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let issues = input
            .context
            .id_references
            .iter()
            .filter(|r| !r.resolved)
            .map(|r| {
                self.error(
                    input.element(),
                    format!("{} references missing id \"{}\"", r.attribute, r.id),
                )
                .with_details(attribute_detail(&r.attribute, Some(&r.id)))
            })
            .collect();
        Ok(CheckOutcome::from_issues(issues).into())
    }
}

/// `aria-live` and `aria-relevant` carry valid tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveRegion;

impl LiveRegion {
    pub const ID: &'static str = "live-region";
}

impl Check for LiveRegion {
    check_identity!(Self::ID, STATUS_MESSAGES, AA);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.attribute("aria-live").is_some()
            || input.context.attribute("aria-relevant").is_some()
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let rules = [
            ("aria-live", AttributeKind::Token(LIVE_TOKENS)),
            ("aria-relevant", AttributeKind::TokenList(RELEVANT_TOKENS)),
        ];
        let issues = rules
            .into_iter()
            .filter_map(|(name, kind)| {
                let value = input.context.attribute(name)?;
                (!kind.accepts(value)).then(|| {
                    self.error(
                        input.element(),
                        format!("{name}=\"{value}\" must be {}", kind.describe()),
                    )
                    .with_details(attribute_detail(name, Some(value)))
                })
            })
            .collect();
        Ok(CheckOutcome::from_issues(issues).into())
    }
}
