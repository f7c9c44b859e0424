#![forbid(unsafe_code)]

//! WCAG hierarchy identifiers.
//!
//! A success criterion is addressed by a dotted triple such as `1.4.3`.
//! The first component names its [`Principle`], the first two its guideline.
//! Identifiers are plain `Copy` values so findings and suites can carry them
//! without allocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The four top-level WCAG principles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Principle {
    Perceivable,
    Operable,
    Understandable,
    Robust,
}

impl Principle {
    /// All principles in WCAG order.
    pub const ALL: [Self; 4] = [
        Self::Perceivable,
        Self::Operable,
        Self::Understandable,
        Self::Robust,
    ];

    /// WCAG number (1-4).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Perceivable => 1,
            Self::Operable => 2,
            Self::Understandable => 3,
            Self::Robust => 4,
        }
    }

    #[must_use]
    pub const fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Perceivable),
            2 => Some(Self::Operable),
            3 => Some(Self::Understandable),
            4 => Some(Self::Robust),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Perceivable => "Perceivable",
            Self::Operable => "Operable",
            Self::Understandable => "Understandable",
            Self::Robust => "Robust",
        }
    }
}

impl fmt::Display for Principle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Principle {
    type Err = CriterionIdError;

    /// Accepts either the name (`"robust"`) or the number (`"4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Self::from_number(n).ok_or_else(|| CriterionIdError(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CriterionIdError(s.to_string()))
    }
}

/// Guideline identifier, e.g. `1.4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuidelineId {
    principle: Principle,
    number: u8,
}

impl GuidelineId {
    #[must_use]
    pub const fn new(principle: Principle, number: u8) -> Self {
        Self { principle, number }
    }

    #[must_use]
    pub const fn principle(self) -> Principle {
        self.principle
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }
}

impl fmt::Display for GuidelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.principle.number(), self.number)
    }
}

impl FromStr for GuidelineId {
    type Err = CriterionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CriterionIdError(s.to_string());
        let (p, g) = s.trim().split_once('.').ok_or_else(err)?;
        let principle = Principle::from_number(p.parse().map_err(|_| err())?).ok_or_else(err)?;
        let number = g.parse::<u8>().map_err(|_| err())?;
        if number == 0 {
            return Err(err());
        }
        Ok(Self::new(principle, number))
    }
}

impl Serialize for GuidelineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GuidelineId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Success criterion identifier, e.g. `1.4.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CriterionId {
    guideline: GuidelineId,
    number: u8,
}

impl CriterionId {
    /// Build an id from its three numeric components.
    ///
    /// Returns `None` when the principle is not 1-4 or a component is zero.
    #[must_use]
    pub const fn new(principle: u8, guideline: u8, criterion: u8) -> Option<Self> {
        let Some(principle) = Principle::from_number(principle) else {
            return None;
        };
        if guideline == 0 || criterion == 0 {
            return None;
        }
        Some(Self {
            guideline: GuidelineId::new(principle, guideline),
            number: criterion,
        })
    }

    /// Const constructor for catalog tables. Panics at compile time on a bad id.
    #[must_use]
    pub const fn of(principle: u8, guideline: u8, criterion: u8) -> Self {
        match Self::new(principle, guideline, criterion) {
            Some(id) => id,
            None => panic!("invalid criterion id"),
        }
    }

    #[must_use]
    pub const fn principle(self) -> Principle {
        self.guideline.principle
    }

    #[must_use]
    pub const fn guideline(self) -> GuidelineId {
        self.guideline
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.guideline, self.number)
    }
}

/// Error returned for malformed hierarchy identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionIdError(pub String);

impl fmt::Display for CriterionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed WCAG identifier: {:?}", self.0)
    }
}

impl std::error::Error for CriterionIdError {}

impl FromStr for CriterionId {
    type Err = CriterionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CriterionIdError(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u8, CriterionIdError> {
            parts.next().ok_or_else(err)?.parse::<u8>().map_err(|_| err())
        };
        let (p, g, c) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Self::new(p, g, c).ok_or_else(err)
    }
}

impl Serialize for CriterionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CriterionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_display_round_trip() {
        let id = CriterionId::of(1, 4, 3);
        assert_eq!(id.to_string(), "1.4.3");
        assert_eq!("1.4.3".parse::<CriterionId>(), Ok(id));
    }

    #[test]
    fn criterion_knows_its_ancestors() {
        let id = CriterionId::of(4, 1, 2);
        assert_eq!(id.principle(), Principle::Robust);
        assert_eq!(id.guideline().to_string(), "4.1");
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for bad in ["", "1.4", "1.4.3.2", "5.1.1", "1.0.1", "a.b.c", "1.4.-1"] {
            assert!(bad.parse::<CriterionId>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn criteria_sort_numerically() {
        let mut ids = vec![
            CriterionId::of(1, 4, 11),
            CriterionId::of(1, 4, 3),
            CriterionId::of(1, 1, 1),
        ];
        ids.sort();
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1.1.1", "1.4.3", "1.4.11"]);
    }

    #[test]
    fn principle_parses_name_or_number() {
        assert_eq!("operable".parse::<Principle>(), Ok(Principle::Operable));
        assert_eq!("3".parse::<Principle>(), Ok(Principle::Understandable));
        assert!("9".parse::<Principle>().is_err());
    }

    #[test]
    fn criterion_serializes_as_dotted_string() {
        let json = serde_json::to_string(&CriterionId::of(2, 4, 4)).unwrap();
        assert_eq!(json, "\"2.4.4\"");
        let back: CriterionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CriterionId::of(2, 4, 4));
    }
}
