#![forbid(unsafe_code)]

//! ARIA role and attribute tables.
//!
//! Roles follow WAI-ARIA 1.1. Abstract roles are listed so they can be
//! reported as invalid rather than unknown.

use lumen_core::InspectionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleCategory {
    /// Never valid in content.
    Abstract,
    Widget,
    Composite,
    Structure,
    Landmark,
    LiveRegion,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub name: &'static str,
    pub category: RoleCategory,
    /// States and properties the role requires.
    pub required: &'static [&'static str],
    /// Whether the role must have an accessible name.
    pub needs_name: bool,
    /// Whether the name may come from the element's text content.
    pub name_from_content: bool,
}

const fn role(
    name: &'static str,
    category: RoleCategory,
    required: &'static [&'static str],
    needs_name: bool,
    name_from_content: bool,
) -> RoleSpec {
    RoleSpec {
        name,
        category,
        required,
        needs_name,
        name_from_content,
    }
}

use RoleCategory::{Abstract, Composite, Landmark, LiveRegion, Structure, Widget, Window};

/// Sorted by name for binary search.
#[rustfmt::skip]
static ROLES: &[RoleSpec] = &[
    role("alert", LiveRegion, &[], false, false),
    role("alertdialog", Window, &[], true, false),
    role("application", Structure, &[], true, false),
    role("article", Structure, &[], false, false),
    role("banner", Landmark, &[], false, false),
    role("button", Widget, &[], true, true),
    role("cell", Structure, &[], false, true),
    role("checkbox", Widget, &["aria-checked"], true, true),
    role("columnheader", Structure, &[], false, true),
    role("combobox", Composite, &["aria-expanded"], true, false),
    role("command", Abstract, &[], false, false),
    role("complementary", Landmark, &[], false, false),
    role("composite", Abstract, &[], false, false),
    role("contentinfo", Landmark, &[], false, false),
    role("definition", Structure, &[], false, false),
    role("dialog", Window, &[], true, false),
    role("directory", Structure, &[], false, false),
    role("document", Structure, &[], false, false),
    role("feed", Structure, &[], false, false),
    role("figure", Structure, &[], false, false),
    role("form", Landmark, &[], false, false),
    role("grid", Composite, &[], false, false),
    role("gridcell", Widget, &[], false, true),
    role("group", Structure, &[], false, false),
    role("heading", Structure, &[], false, true),
    role("img", Structure, &[], true, false),
    role("input", Abstract, &[], false, false),
    role("landmark", Abstract, &[], false, false),
    role("link", Widget, &[], true, true),
    role("list", Structure, &[], false, false),
    role("listbox", Composite, &[], true, false),
    role("listitem", Structure, &[], false, false),
    role("log", LiveRegion, &[], false, false),
    role("main", Landmark, &[], false, false),
    role("marquee", LiveRegion, &[], false, false),
    role("math", Structure, &[], false, false),
    role("menu", Composite, &[], false, false),
    role("menubar", Composite, &[], false, false),
    role("menuitem", Widget, &[], true, true),
    role("menuitemcheckbox", Widget, &["aria-checked"], true, true),
    role("menuitemradio", Widget, &["aria-checked"], true, true),
    role("navigation", Landmark, &[], false, false),
    role("none", Structure, &[], false, false),
    role("note", Structure, &[], false, false),
    role("option", Widget, &["aria-selected"], true, true),
    role("presentation", Structure, &[], false, false),
    role("progressbar", Widget, &[], false, false),
    role("radio", Widget, &["aria-checked"], true, true),
    role("radiogroup", Composite, &[], false, false),
    role("range", Abstract, &[], false, false),
    role("region", Landmark, &[], false, false),
    role("roletype", Abstract, &[], false, false),
    role("row", Structure, &[], false, true),
    role("rowgroup", Structure, &[], false, false),
    role("rowheader", Structure, &[], false, true),
    role("scrollbar", Widget, &["aria-controls", "aria-valuenow"], false, false),
    role("search", Landmark, &[], false, false),
    role("searchbox", Widget, &[], true, false),
    role("section", Abstract, &[], false, false),
    role("sectionhead", Abstract, &[], false, false),
    role("select", Abstract, &[], false, false),
    role("separator", Structure, &[], false, false),
    role("slider", Widget, &["aria-valuemax", "aria-valuemin", "aria-valuenow"], true, false),
    role("spinbutton", Widget, &["aria-valuenow"], true, false),
    role("status", LiveRegion, &[], false, false),
    role("structure", Abstract, &[], false, false),
    role("switch", Widget, &["aria-checked"], true, true),
    role("tab", Widget, &[], true, true),
    role("table", Structure, &[], false, false),
    role("tablist", Composite, &[], false, false),
    role("tabpanel", Widget, &[], false, false),
    role("term", Structure, &[], false, false),
    role("textbox", Widget, &[], true, false),
    role("timer", LiveRegion, &[], false, false),
    role("toolbar", Structure, &[], false, false),
    role("tooltip", Structure, &[], false, true),
    role("tree", Composite, &[], false, false),
    role("treegrid", Composite, &[], false, false),
    role("treeitem", Widget, &[], true, true),
    role("widget", Abstract, &[], false, false),
    role("window", Abstract, &[], false, false),
];

/// Look up a role by (case-insensitive) name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static RoleSpec> {
    let name = name.trim().to_ascii_lowercase();
    ROLES
        .binary_search_by(|r| r.name.cmp(name.as_str()))
        .ok()
        .map(|i| &ROLES[i])
}

/// Role a host element carries without an explicit `role` attribute.
#[must_use]
pub fn implicit_role(tag: &str, input_type: Option<&str>) -> Option<&'static str> {
    let role = match tag {
        "a" | "area" => "link",
        "article" => "article",
        "aside" => "complementary",
        "button" => "button",
        "dialog" => "dialog",
        "footer" => "contentinfo",
        "form" => "form",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "header" => "banner",
        "hr" => "separator",
        "html" => "document",
        "img" => "img",
        "li" => "listitem",
        "main" => "main",
        "nav" => "navigation",
        "ol" | "ul" => "list",
        "option" => "option",
        "progress" => "progressbar",
        "select" => "combobox",
        "table" => "table",
        "textarea" => "textbox",
        "input" => match input_type.map(str::to_ascii_lowercase).as_deref() {
            Some("checkbox") => "checkbox",
            Some("radio") => "radio",
            Some("range") => "slider",
            Some("number") => "spinbutton",
            Some("search") => "searchbox",
            Some("button" | "submit" | "reset" | "image") => "button",
            Some("hidden") => return None,
            _ => "textbox",
        },
        _ => return None,
    };
    Some(role)
}

/// Explicit role when declared (first token), else the tag's implicit role.
#[must_use]
pub fn effective_role(context: &InspectionContext) -> Option<String> {
    if let Some(explicit) = context
        .role
        .as_deref()
        .and_then(|r| r.split_whitespace().next())
    {
        return Some(explicit.to_ascii_lowercase());
    }
    let tag = context.tag.as_deref()?;
    implicit_role(tag, context.attribute("type")).map(str::to_string)
}

/// Whether the element's role is presentational (`none` / `presentation`).
#[must_use]
pub fn is_presentational(context: &InspectionContext) -> bool {
    matches!(
        effective_role(context).as_deref(),
        Some("none" | "presentation")
    )
}

/// Heading level from `aria-level`, falling back to an `h1`-`h6` tag.
///
/// `Some(Err(raw))` when `aria-level` is present but not an integer.
#[must_use]
pub fn heading_level(context: &InspectionContext) -> Option<Result<i64, String>> {
    if let Some(raw) = context.attribute("aria-level") {
        return Some(raw.trim().parse::<i64>().map_err(|_| raw.to_string()));
    }
    let tag = context.tag.as_deref()?;
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<i64>() {
        Ok(n @ 1..=6) => Some(Ok(n)),
        _ => None,
    }
}

/// Value domain of an ARIA state or property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// `true` / `false`.
    Boolean,
    /// `true` / `false` / `mixed`.
    Tristate,
    /// Integer no smaller than the bound.
    Integer { min: i64 },
    Number,
    /// Exactly one of the listed tokens.
    Token(&'static [&'static str]),
    /// Whitespace-separated list of listed tokens.
    TokenList(&'static [&'static str]),
    /// One id reference.
    IdRef,
    /// Whitespace-separated id references.
    IdRefList,
    /// Free text.
    Text,
}

impl AttributeKind {
    /// Whether `value` lies in this domain. Id references are only checked
    /// for syntax; resolution is the host's answer.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Boolean => matches!(value, "true" | "false"),
            Self::Tristate => matches!(value, "true" | "false" | "mixed"),
            Self::Integer { min } => value.parse::<i64>().is_ok_and(|v| v >= min),
            Self::Number => value.parse::<f64>().is_ok_and(f64::is_finite),
            Self::Token(allowed) => allowed.contains(&value),
            Self::TokenList(allowed) => {
                let mut tokens = value.split_whitespace().peekable();
                tokens.peek().is_some() && tokens.all(|t| allowed.contains(&t))
            }
            Self::IdRef => !value.is_empty() && !value.contains(char::is_whitespace),
            Self::IdRefList => !value.is_empty(),
            Self::Text => true,
        }
    }

    /// Human-readable domain for finding messages.
    #[must_use]
    pub fn describe(self) -> String {
        match self {
            Self::Boolean => "true or false".to_string(),
            Self::Tristate => "true, false or mixed".to_string(),
            Self::Integer { min } => format!("an integer >= {min}"),
            Self::Number => "a number".to_string(),
            Self::Token(allowed) => format!("one of {}", allowed.join(", ")),
            Self::TokenList(allowed) => format!("a list of {}", allowed.join(", ")),
            Self::IdRef => "a single id".to_string(),
            Self::IdRefList => "a list of ids".to_string(),
            Self::Text => "text".to_string(),
        }
    }
}

pub const LIVE_TOKENS: &[&str] = &["off", "polite", "assertive"];
pub const RELEVANT_TOKENS: &[&str] = &["additions", "removals", "text", "all"];

/// Sorted by name for binary search.
static ATTRIBUTES: &[(&str, AttributeKind)] = &[
    ("aria-activedescendant", AttributeKind::IdRef),
    ("aria-atomic", AttributeKind::Boolean),
    (
        "aria-autocomplete",
        AttributeKind::Token(&["inline", "list", "both", "none"]),
    ),
    ("aria-busy", AttributeKind::Boolean),
    ("aria-checked", AttributeKind::Tristate),
    ("aria-colcount", AttributeKind::Integer { min: -1 }),
    ("aria-colindex", AttributeKind::Integer { min: 1 }),
    ("aria-colspan", AttributeKind::Integer { min: 1 }),
    ("aria-controls", AttributeKind::IdRefList),
    (
        "aria-current",
        AttributeKind::Token(&["page", "step", "location", "date", "time", "true", "false"]),
    ),
    ("aria-describedby", AttributeKind::IdRefList),
    ("aria-details", AttributeKind::IdRef),
    ("aria-disabled", AttributeKind::Boolean),
    (
        "aria-dropeffect",
        AttributeKind::TokenList(&["copy", "execute", "link", "move", "none", "popup"]),
    ),
    ("aria-errormessage", AttributeKind::IdRef),
    ("aria-expanded", AttributeKind::Boolean),
    ("aria-flowto", AttributeKind::IdRefList),
    ("aria-grabbed", AttributeKind::Boolean),
    (
        "aria-haspopup",
        AttributeKind::Token(&["false", "true", "menu", "listbox", "tree", "grid", "dialog"]),
    ),
    ("aria-hidden", AttributeKind::Boolean),
    (
        "aria-invalid",
        AttributeKind::Token(&["grammar", "false", "spelling", "true"]),
    ),
    ("aria-keyshortcuts", AttributeKind::Text),
    ("aria-label", AttributeKind::Text),
    ("aria-labelledby", AttributeKind::IdRefList),
    ("aria-level", AttributeKind::Integer { min: 1 }),
    ("aria-live", AttributeKind::Token(LIVE_TOKENS)),
    ("aria-modal", AttributeKind::Boolean),
    ("aria-multiline", AttributeKind::Boolean),
    ("aria-multiselectable", AttributeKind::Boolean),
    (
        "aria-orientation",
        AttributeKind::Token(&["horizontal", "vertical", "undefined"]),
    ),
    ("aria-owns", AttributeKind::IdRefList),
    ("aria-placeholder", AttributeKind::Text),
    ("aria-posinset", AttributeKind::Integer { min: 1 }),
    ("aria-pressed", AttributeKind::Tristate),
    ("aria-readonly", AttributeKind::Boolean),
    ("aria-relevant", AttributeKind::TokenList(RELEVANT_TOKENS)),
    ("aria-required", AttributeKind::Boolean),
    ("aria-roledescription", AttributeKind::Text),
    ("aria-rowcount", AttributeKind::Integer { min: -1 }),
    ("aria-rowindex", AttributeKind::Integer { min: 1 }),
    ("aria-rowspan", AttributeKind::Integer { min: 0 }),
    ("aria-selected", AttributeKind::Boolean),
    ("aria-setsize", AttributeKind::Integer { min: -1 }),
    (
        "aria-sort",
        AttributeKind::Token(&["ascending", "descending", "none", "other"]),
    ),
    ("aria-valuemax", AttributeKind::Number),
    ("aria-valuemin", AttributeKind::Number),
    ("aria-valuenow", AttributeKind::Number),
    ("aria-valuetext", AttributeKind::Text),
];

/// Value domain of a known `aria-*` attribute.
#[must_use]
pub fn attribute_kind(name: &str) -> Option<AttributeKind> {
    ATTRIBUTES
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|i| ATTRIBUTES[i].1)
}
