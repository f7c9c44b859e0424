//! The WCAG 2.1 success-criterion catalog.
//!
//! Static data only. [`RegistryBuilder::wcag21`](crate::RegistryBuilder::wcag21)
//! loads these tables into a registry.

use lumen_core::{ConformanceLevel, CriterionId, GuidelineId, Principle};

use ConformanceLevel::{A, AA, AAA};

/// Version tag of the bundled catalog.
pub const WCAG_2_1: &str = "wcag-2.1";

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriterionEntry {
    pub id: CriterionId,
    pub name: &'static str,
    pub level: ConformanceLevel,
}

const fn sc(p: u8, g: u8, c: u8, name: &'static str, level: ConformanceLevel) -> CriterionEntry {
    CriterionEntry {
        id: CriterionId::of(p, g, c),
        name,
        level,
    }
}

const fn gl(p: Principle, n: u8, name: &'static str) -> (GuidelineId, &'static str) {
    (GuidelineId::new(p, n), name)
}

pub static GUIDELINES: [(GuidelineId, &str); 13] = [
    gl(Principle::Perceivable, 1, "Text Alternatives"),
    gl(Principle::Perceivable, 2, "Time-based Media"),
    gl(Principle::Perceivable, 3, "Adaptable"),
    gl(Principle::Perceivable, 4, "Distinguishable"),
    gl(Principle::Operable, 1, "Keyboard Accessible"),
    gl(Principle::Operable, 2, "Enough Time"),
    gl(Principle::Operable, 3, "Seizures and Physical Reactions"),
    gl(Principle::Operable, 4, "Navigable"),
    gl(Principle::Operable, 5, "Input Modalities"),
    gl(Principle::Understandable, 1, "Readable"),
    gl(Principle::Understandable, 2, "Predictable"),
    gl(Principle::Understandable, 3, "Input Assistance"),
    gl(Principle::Robust, 1, "Compatible"),
];

pub static CRITERIA: [CriterionEntry; 78] = [
    sc(1, 1, 1, "Non-text Content", A),
    sc(1, 2, 1, "Audio-only and Video-only (Prerecorded)", A),
    sc(1, 2, 2, "Captions (Prerecorded)", A),
    sc(1, 2, 3, "Audio Description or Media Alternative (Prerecorded)", A),
    sc(1, 2, 4, "Captions (Live)", AA),
    sc(1, 2, 5, "Audio Description (Prerecorded)", AA),
    sc(1, 2, 6, "Sign Language (Prerecorded)", AAA),
    sc(1, 2, 7, "Extended Audio Description (Prerecorded)", AAA),
    sc(1, 2, 8, "Media Alternative (Prerecorded)", AAA),
    sc(1, 2, 9, "Audio-only (Live)", AAA),
    sc(1, 3, 1, "Info and Relationships", A),
    sc(1, 3, 2, "Meaningful Sequence", A),
    sc(1, 3, 3, "Sensory Characteristics", A),
    sc(1, 3, 4, "Orientation", AA),
    sc(1, 3, 5, "Identify Input Purpose", AA),
    sc(1, 3, 6, "Identify Purpose", AAA),
    sc(1, 4, 1, "Use of Color", A),
    sc(1, 4, 2, "Audio Control", A),
    sc(1, 4, 3, "Contrast (Minimum)", AA),
    sc(1, 4, 4, "Resize Text", AA),
    sc(1, 4, 5, "Images of Text", AA),
    sc(1, 4, 6, "Contrast (Enhanced)", AAA),
    sc(1, 4, 7, "Low or No Background Audio", AAA),
    sc(1, 4, 8, "Visual Presentation", AAA),
    sc(1, 4, 9, "Images of Text (No Exception)", AAA),
    sc(1, 4, 10, "Reflow", AA),
    sc(1, 4, 11, "Non-text Contrast", AA),
    sc(1, 4, 12, "Text Spacing", AA),
    sc(1, 4, 13, "Content on Hover or Focus", AA),
    sc(2, 1, 1, "Keyboard", A),
    sc(2, 1, 2, "No Keyboard Trap", A),
    sc(2, 1, 3, "Keyboard (No Exception)", AAA),
    sc(2, 1, 4, "Character Key Shortcuts", A),
    sc(2, 2, 1, "Timing Adjustable", A),
    sc(2, 2, 2, "Pause, Stop, Hide", A),
    sc(2, 2, 3, "No Timing", AAA),
    sc(2, 2, 4, "Interruptions", AAA),
    sc(2, 2, 5, "Re-authenticating", AAA),
    sc(2, 2, 6, "Timeouts", AAA),
    sc(2, 3, 1, "Three Flashes or Below Threshold", A),
    sc(2, 3, 2, "Three Flashes", AAA),
    sc(2, 3, 3, "Animation from Interactions", AAA),
    sc(2, 4, 1, "Bypass Blocks", A),
    sc(2, 4, 2, "Page Titled", A),
    sc(2, 4, 3, "Focus Order", A),
    sc(2, 4, 4, "Link Purpose (In Context)", A),
    sc(2, 4, 5, "Multiple Ways", AA),
    sc(2, 4, 6, "Headings and Labels", AA),
    sc(2, 4, 7, "Focus Visible", AA),
    sc(2, 4, 8, "Location", AAA),
    sc(2, 4, 9, "Link Purpose (Link Only)", AAA),
    sc(2, 4, 10, "Section Headings", AAA),
    sc(2, 5, 1, "Pointer Gestures", A),
    sc(2, 5, 2, "Pointer Cancellation", A),
    sc(2, 5, 3, "Label in Name", A),
    sc(2, 5, 4, "Motion Actuation", A),
    sc(2, 5, 5, "Target Size", AAA),
    sc(2, 5, 6, "Concurrent Input Mechanisms", AAA),
    sc(3, 1, 1, "Language of Page", A),
    sc(3, 1, 2, "Language of Parts", AA),
    sc(3, 1, 3, "Unusual Words", AAA),
    sc(3, 1, 4, "Abbreviations", AAA),
    sc(3, 1, 5, "Reading Level", AAA),
    sc(3, 1, 6, "Pronunciation", AAA),
    sc(3, 2, 1, "On Focus", A),
    sc(3, 2, 2, "On Input", A),
    sc(3, 2, 3, "Consistent Navigation", AA),
    sc(3, 2, 4, "Consistent Identification", AA),
    sc(3, 2, 5, "Change on Request", AAA),
    sc(3, 3, 1, "Error Identification", A),
    sc(3, 3, 2, "Labels or Instructions", A),
    sc(3, 3, 3, "Error Suggestion", AA),
    sc(3, 3, 4, "Error Prevention (Legal, Financial, Data)", AA),
    sc(3, 3, 5, "Help", AAA),
    sc(3, 3, 6, "Error Prevention (All)", AAA),
    sc(4, 1, 1, "Parsing", A),
    sc(4, 1, 2, "Name, Role, Value", A),
    sc(4, 1, 3, "Status Messages", AA),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_are_sorted_and_unique() {
        assert!(CRITERIA.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn every_criterion_has_a_guideline() {
        for entry in &CRITERIA {
            assert!(
                GUIDELINES.iter().any(|(g, _)| *g == entry.id.guideline()),
                "{} has no guideline",
                entry.id
            );
        }
    }

    #[test]
    fn level_counts_match_wcag_2_1() {
        let count = |level| CRITERIA.iter().filter(|c| c.level == level).count();
        assert_eq!((count(A), count(AA), count(AAA)), (30, 20, 28));
    }

    #[test]
    fn contrast_rows() {
        let find = |id: &str| {
            let id: CriterionId = id.parse().unwrap();
            CRITERIA.iter().find(|c| c.id == id).copied().unwrap()
        };
        assert_eq!(find("1.4.3").level, AA);
        assert_eq!(find("1.4.6").level, AAA);
        assert_eq!(find("1.4.11").name, "Non-text Contrast");
    }
}
