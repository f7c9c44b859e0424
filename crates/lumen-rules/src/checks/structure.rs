//! Structural and naming checks (1.1.1, 1.3.1, 2.4.x, 2.5.3, 3.1.1, 3.3.2).

use lumen_core::{ConformanceLevel, CriterionId, FindingDetail, InspectionContext};

use crate::aria_roles::{effective_role, heading_level, lookup};
use crate::check::{Check, CheckError, CheckInput, CheckOutcome, Evaluation};

fn role_is(ctx: &InspectionContext, role: &str) -> bool {
    effective_role(ctx).as_deref() == Some(role)
}

/// Accessible name, falling back to visible text.
fn name_or_text(ctx: &InspectionContext) -> Option<&str> {
    ctx.name().or_else(|| ctx.visible_text())
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Images expose a text alternative unless presentational.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageAlternative;

impl ImageAlternative {
    pub const ID: &'static str = "image-alternative";
}

impl Check for ImageAlternative {
    check_identity!(Self::ID, CriterionId::of(1, 1, 1), A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.is_visible() && role_is(input.context, "img")
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let ctx = input.context;
        // An explicitly empty alt marks the image as decorative.
        let decorative = ctx.attribute("alt").is_some_and(|alt| alt.is_empty());
        let alt = ctx.attribute("alt").map(str::trim).filter(|a| !a.is_empty());
        if decorative || ctx.name().is_some() || alt.is_some() {
            return Ok(CheckOutcome::pass().into());
        }
        let finding = self
            .error(input.element(), "image has no text alternative".to_string())
            .with_suggestion("add alt text, or alt=\"\" if the image is decorative")
            .with_details(FindingDetail::Attribute {
                name: "alt".to_string(),
                value: None,
            });
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Headings carry a level between 1 and 6.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingStructure;

impl HeadingStructure {
    pub const ID: &'static str = "heading-structure";
}

impl Check for HeadingStructure {
    check_identity!(Self::ID, CriterionId::of(1, 3, 1), A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        role_is(input.context, "heading")
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let message = match heading_level(input.context) {
            Some(Ok(1..=6)) => return Ok(CheckOutcome::pass().into()),
            Some(Ok(level)) => format!("heading level {level} is outside 1-6"),
            Some(Err(raw)) => format!("aria-level \"{raw}\" is not an integer"),
            None => "heading has no level".to_string(),
        };
        let finding = self
            .error(input.element(), message)
            .with_suggestion("set aria-level to a value from 1 to 6")
            .with_details(FindingDetail::Attribute {
                name: "aria-level".to_string(),
                value: input.context.attribute("aria-level").map(str::to_string),
            });
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Positive `tabindex` overrides the document's focus order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusOrder;

impl FocusOrder {
    pub const ID: &'static str = "focus-order";
}

impl Check for FocusOrder {
    check_identity!(Self::ID, CriterionId::of(2, 4, 3), A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.attribute("tabindex").is_some()
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let raw = input.context.attribute("tabindex").unwrap_or_default();
        let message = match raw.trim().parse::<i32>() {
            Ok(n) if n > 0 => {
                format!("tabindex={n} moves the element ahead of the natural focus order")
            }
            Ok(_) => return Ok(CheckOutcome::pass().into()),
            Err(_) => format!("tabindex \"{raw}\" is not an integer and is ignored"),
        };
        let warning = self
            .warning(input.element(), message)
            .with_suggestion("use tabindex=\"0\" and order elements in the document instead")
            .with_details(FindingDetail::Attribute {
                name: "tabindex".to_string(),
                value: Some(raw.to_string()),
            });
        Ok(CheckOutcome::pass().with_warning(warning).into())
    }
}

/// Links have a non-empty accessible name.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkPurpose;

impl LinkPurpose {
    pub const ID: &'static str = "link-purpose";
}

impl Check for LinkPurpose {
    check_identity!(Self::ID, CriterionId::of(2, 4, 4), A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.is_visible() && role_is(input.context, "link")
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        if name_or_text(input.context).is_some() {
            return Ok(CheckOutcome::pass().into());
        }
        let finding = self
            .error(input.element(), "link has no text or accessible name".to_string())
            .with_suggestion("describe the link destination in its text or aria-label");
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Headings and labels are not empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingsAndLabels;

impl HeadingsAndLabels {
    pub const ID: &'static str = "headings-and-labels";
}

impl Check for HeadingsAndLabels {
    check_identity!(Self::ID, CriterionId::of(2, 4, 6), AA);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.is_visible()
            && (role_is(input.context, "heading") || input.context.tag.as_deref() == Some("label"))
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        if name_or_text(input.context).is_some() {
            return Ok(CheckOutcome::pass().into());
        }
        let what = if role_is(input.context, "heading") {
            "heading"
        } else {
            "label"
        };
        let finding = self.error(input.element(), format!("{what} is empty"));
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Phrases that say nothing about a link's destination.
const GENERIC_LINK_TEXT: &[&str] = &[
    "click",
    "click here",
    "continue",
    "details",
    "go",
    "here",
    "learn more",
    "link",
    "more",
    "read more",
    "this",
];

/// Link names describe the destination without surrounding context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkPurposeLinkOnly;

impl LinkPurposeLinkOnly {
    pub const ID: &'static str = "link-purpose-link-only";
}

impl Check for LinkPurposeLinkOnly {
    check_identity!(Self::ID, CriterionId::of(2, 4, 9), AAA);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.is_visible()
            && role_is(input.context, "link")
            && name_or_text(input.context).is_some()
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let name = name_or_text(input.context).unwrap_or_default();
        let key = normalize(name);
        let key = key.trim_end_matches(['.', '!', '>', '\u{2026}']).trim();
        if !GENERIC_LINK_TEXT.contains(&key) {
            return Ok(CheckOutcome::pass().into());
        }
        let finding = self
            .error(
                input.element(),
                format!("link text \"{name}\" does not describe its destination"),
            )
            .with_suggestion("name the destination, e.g. \"Read the pricing guide\"");
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// The accessible name of a labelled control contains its visible text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelInName;

impl LabelInName {
    pub const ID: &'static str = "label-in-name";
}

impl Check for LabelInName {
    check_identity!(Self::ID, CriterionId::of(2, 5, 3), A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        let ctx = input.context;
        ctx.is_visible()
            && ctx.has_text()
            && ctx.name().is_some()
            && effective_role(ctx)
                .and_then(|r| lookup(&r))
                .is_some_and(|spec| spec.name_from_content)
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let ctx = input.context;
        let (Some(name), Some(text)) = (ctx.name(), ctx.visible_text()) else {
            return Ok(Evaluation::NotApplicable);
        };
        if normalize(name).contains(&normalize(text)) {
            return Ok(CheckOutcome::pass().into());
        }
        let finding = self
            .error(
                input.element(),
                format!("accessible name \"{name}\" does not contain visible label \"{text}\""),
            )
            .with_suggestion(format!("start the accessible name with \"{text}\""));
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Loose BCP 47 shape: a 2-8 letter primary subtag, then 1-8 alphanumerics.
fn is_language_tag(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|p| (2..=8).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_alphabetic()));
    primary_ok
        && parts.all(|p| (1..=8).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// The document root declares a valid language.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageOfPage;

impl LanguageOfPage {
    pub const ID: &'static str = "language-of-page";
}

impl Check for LanguageOfPage {
    check_identity!(Self::ID, CriterionId::of(3, 1, 1), A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        input.context.tag.as_deref() == Some("html")
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        let lang = input.context.attribute("lang").map(str::trim);
        let message = match lang {
            Some(tag) if is_language_tag(tag) => return Ok(CheckOutcome::pass().into()),
            Some("") | None => "document has no lang attribute".to_string(),
            Some(tag) => format!("lang=\"{tag}\" is not a valid language tag"),
        };
        let finding = self
            .error(input.element(), message)
            .with_suggestion("set lang on the root element, e.g. lang=\"en\"")
            .with_details(FindingDetail::Attribute {
                name: "lang".to_string(),
                value: lang.map(str::to_string),
            });
        Ok(CheckOutcome::fail(finding).into())
    }
}

/// Form fields have a label.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormLabels;

impl FormLabels {
    pub const ID: &'static str = "form-labels";
}

const UNLABELLED_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

impl Check for FormLabels {
    check_identity!(Self::ID, CriterionId::of(3, 3, 2), A);

    fn applies_to(&self, input: &CheckInput<'_>) -> bool {
        let ctx = input.context;
        if !ctx.is_visible() {
            return false;
        }
        match ctx.tag.as_deref() {
            Some("select" | "textarea") => true,
            Some("input") => !ctx
                .attribute("type")
                .is_some_and(|t| UNLABELLED_INPUT_TYPES.contains(&t.to_ascii_lowercase().as_str())),
            _ => matches!(
                effective_role(ctx).as_deref(),
                Some("textbox" | "searchbox" | "combobox" | "spinbutton")
            ),
        }
    }

    fn evaluate(&self, input: &CheckInput<'_>) -> Result<Evaluation, CheckError> {
        if input.context.name().is_some() {
            return Ok(CheckOutcome::pass().into());
        }
        let suggestion = if input.context.attribute("placeholder").is_some() {
            "placeholder text is not a label; associate a <label> or set aria-label"
        } else {
            "associate a <label> or set aria-label"
        };
        let finding = self
            .error(input.element(), "form field has no label".to_string())
            .with_suggestion(suggestion);
        Ok(CheckOutcome::fail(finding).into())
    }
}
