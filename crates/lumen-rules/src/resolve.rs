#![forbid(unsafe_code)]

//! Per-element color resolution.
//!
//! Color strings are parsed and composited once per element, before any
//! check runs. A string that fails to parse leaves the matching slot empty and
//! records a [`StyleFault`]; checks that need the slot report not applicable.

use lumen_color::{Color, ParseCache, ParseError, flatten, is_large_text};
use lumen_core::InspectionContext;
use tracing::debug;

/// Which input a parse failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSlot {
    Foreground,
    Background,
    Border,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleFault {
    pub slot: StyleSlot,
    pub input: String,
    pub error: ParseError,
}

/// Colors of one element as they are actually perceived.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// Text color composited over `background`; always opaque.
    pub foreground: Option<Color>,
    /// Flattened background stack; always opaque.
    pub background: Option<Color>,
    /// Border color composited over `background`; always opaque.
    pub border: Option<Color>,
    pub large_text: bool,
    pub faults: Vec<StyleFault>,
}

impl ResolvedStyle {
    /// Resolve `context`'s colors through `cache`.
    pub fn resolve(context: &InspectionContext, cache: &mut ParseCache) -> Self {
        let mut faults = Vec::new();
        let mut parse = |slot: StyleSlot, input: &str| match cache.parse(input) {
            Ok(color) => Some(color),
            Err(error) => {
                debug!(element = %context.element, ?slot, input, %error, "unparseable color");
                faults.push(StyleFault {
                    slot,
                    input: input.to_string(),
                    error,
                });
                None
            }
        };

        let layers: Option<Vec<Color>> = context
            .background_layers
            .iter()
            .map(|layer| parse(StyleSlot::Background, layer))
            .collect();
        let background = layers.map(flatten);

        let foreground = context
            .foreground
            .as_deref()
            .and_then(|fg| parse(StyleSlot::Foreground, fg));
        let border = context
            .border
            .as_deref()
            .and_then(|b| parse(StyleSlot::Border, b));

        let over = |c: Option<Color>| match (c, background) {
            (Some(c), Some(bg)) => Some(c.over(bg)),
            _ => None,
        };
        Self {
            foreground: over(foreground),
            background,
            border: over(border),
            large_text: is_large_text(context.font_size, context.font_weight),
            faults,
        }
    }

    /// Opaque `(text, background)` pair, when both resolved.
    #[must_use]
    pub fn text_pair(&self) -> Option<(Color, Color)> {
        Some((self.foreground?, self.background?))
    }

    /// Opaque `(border, background)` pair, when both resolved.
    #[must_use]
    pub fn border_pair(&self) -> Option<(Color, Color)> {
        Some((self.border?, self.background?))
    }

    #[must_use]
    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::ElementHandle;

    fn resolve(ctx: &InspectionContext) -> ResolvedStyle {
        ResolvedStyle::resolve(ctx, &mut ParseCache::new())
    }

    #[test]
    fn missing_background_defaults_to_white() {
        let ctx = InspectionContext::new(ElementHandle(1)).with_foreground("#000");
        let style = resolve(&ctx);
        assert_eq!(style.text_pair(), Some((Color::BLACK, Color::WHITE)));
        assert!(!style.has_faults());
    }

    #[test]
    fn translucent_text_is_composited() {
        let ctx = InspectionContext::new(ElementHandle(1))
            .with_foreground("rgba(0, 0, 0, 0.5)")
            .with_background("#ffffff");
        let (fg, _) = resolve(&ctx).text_pair().unwrap();
        assert_eq!(fg, Color::rgb(128, 128, 128));
    }

    #[test]
    fn background_stack_is_flattened() {
        let ctx = InspectionContext::new(ElementHandle(1))
            .with_foreground("black")
            .with_background("transparent")
            .with_background("rgb(0 0 255)");
        assert_eq!(resolve(&ctx).background, Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn unparseable_background_is_a_fault() {
        let ctx = InspectionContext::new(ElementHandle(1))
            .with_foreground("black")
            .with_background("not-a-color");
        let style = resolve(&ctx);
        assert_eq!(style.background, None);
        assert_eq!(style.text_pair(), None);
        assert_eq!(style.faults.len(), 1);
        assert_eq!(style.faults[0].slot, StyleSlot::Background);
    }

    #[test]
    fn large_text_is_precomputed() {
        let ctx = InspectionContext::new(ElementHandle(1)).with_font(14.0, 700);
        assert!(resolve(&ctx).large_text);
    }
}
