//! The built-in check set.
//!
//! | check | criterion | level |
//! |-------|-----------|-------|
//! | `text-contrast-minimum` | 1.4.3 | AA |
//! | `text-contrast-enhanced` | 1.4.6 | AAA |
//! | `non-text-contrast` | 1.4.11 | AA |
//! | `color-vision-visibility` | 1.4.1 | A |
//! | `hue-proximity` | 1.4.1 | A |
//! | `image-alternative` | 1.1.1 | A |
//! | `heading-structure` | 1.3.1 | A |
//! | `focus-order` | 2.4.3 | A |
//! | `link-purpose` | 2.4.4 | A |
//! | `headings-and-labels` | 2.4.6 | AA |
//! | `link-purpose-link-only` | 2.4.9 | AAA |
//! | `label-in-name` | 2.5.3 | A |
//! | `language-of-page` | 3.1.1 | A |
//! | `form-labels` | 3.3.2 | A |
//! | `id-references` | 4.1.1 | A |
//! | `aria-role` | 4.1.2 | A |
//! | `aria-required-properties` | 4.1.2 | A |
//! | `aria-attribute-values` | 4.1.2 | A |
//! | `interactive-name` | 4.1.2 | A |
//! | `live-region` | 4.1.3 | AA |

/// `id`, `criterion` and `level` for checks with a fixed identity.
macro_rules! check_identity {
    ($id:expr, $criterion:expr, $level:ident) => {
        fn id(&self) -> &'static str {
            $id
        }

        fn criterion(&self) -> CriterionId {
            $criterion
        }

        fn level(&self) -> ConformanceLevel {
            ConformanceLevel::$level
        }
    };
}

pub mod aria;
pub mod color_vision;
pub mod contrast;
pub mod structure;

pub use aria::{
    AriaAttributeValues, AriaRequiredProperties, AriaRole, IdReferences, InteractiveName,
    LiveRegion,
};
pub use color_vision::{ColorVisionVisibility, HueProximity};
pub use contrast::{NonTextContrast, TextContrast};
pub use structure::{
    FocusOrder, FormLabels, HeadingStructure, HeadingsAndLabels, ImageAlternative, LabelInName,
    LanguageOfPage, LinkPurpose, LinkPurposeLinkOnly,
};

use crate::check::Check;

/// Every built-in check, in registration order.
#[must_use]
pub fn builtin() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(TextContrast::minimum()),
        Box::new(TextContrast::enhanced()),
        Box::new(NonTextContrast),
        Box::new(ColorVisionVisibility),
        Box::new(HueProximity),
        Box::new(ImageAlternative),
        Box::new(HeadingStructure),
        Box::new(FocusOrder),
        Box::new(LinkPurpose),
        Box::new(HeadingsAndLabels),
        Box::new(LinkPurposeLinkOnly),
        Box::new(LabelInName),
        Box::new(LanguageOfPage),
        Box::new(FormLabels),
        Box::new(IdReferences),
        Box::new(AriaRole),
        Box::new(AriaRequiredProperties),
        Box::new(AriaAttributeValues),
        Box::new(InteractiveName),
        Box::new(LiveRegion),
    ]
}
