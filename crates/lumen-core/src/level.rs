#![forbid(unsafe_code)]

//! WCAG conformance levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Increasingly strict compliance tiers, ordered `A < AA < AAA`.
///
/// A configured target level admits every check at or below it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ConformanceLevel {
    A,
    #[default]
    AA,
    AAA,
}

impl ConformanceLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 3] = [Self::A, Self::AA, Self::AAA];

    /// Whether a rule tagged `rule_level` runs under this target level.
    #[inline]
    #[must_use]
    pub const fn admits(self, rule_level: Self) -> bool {
        (rule_level as u8) <= (self as u8)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        }
    }
}

impl fmt::Display for ConformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level string is not `A`, `AA` or `AAA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelParseError(pub String);

impl fmt::Display for LevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown conformance level: {:?}", self.0)
    }
}

impl std::error::Error for LevelParseError {}

impl FromStr for ConformanceLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AA" => Ok(Self::AA),
            "AAA" => Ok(Self::AAA),
            _ => Err(LevelParseError(s.to_string())),
        }
    }
}
