#![forbid(unsafe_code)]

//! Audit configuration.
//!
//! Every knob has a default; hosts override them with `with_*` setters or
//! from the environment.
//!
//! # Environment Variables
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `LUMEN_TARGET_LEVEL` | `target_level` | `A`, `AA`, `AAA` |
//! | `LUMEN_PRINCIPLES` | `enabled_principles` | comma list of names or numbers |
//! | `LUMEN_CVD_SIMULATION` | `deficiency_simulation_enabled` | `1/true/yes/on`, `0/false/no/off` |
//! | `LUMEN_TREND_WINDOW` | `trend_window` | integer ≥ 2 |
//! | `LUMEN_TREND_THRESHOLD` | `trend_threshold` | non-negative number |
//! | `LUMEN_HUE_THRESHOLD` | `hue_threshold_degrees` | number in `(0, 180]` |

use std::env;
use std::fmt;

use lumen_color::{DEFAULT_HUE_THRESHOLD, Deficiency, ParseCache};
use lumen_core::{ConformanceLevel, Principle};
use lumen_rules::CheckOptions;

use crate::history::TrendConfig;

pub const ENV_TARGET_LEVEL: &str = "LUMEN_TARGET_LEVEL";
pub const ENV_PRINCIPLES: &str = "LUMEN_PRINCIPLES";
pub const ENV_CVD_SIMULATION: &str = "LUMEN_CVD_SIMULATION";
pub const ENV_TREND_WINDOW: &str = "LUMEN_TREND_WINDOW";
pub const ENV_TREND_THRESHOLD: &str = "LUMEN_TREND_THRESHOLD";
pub const ENV_HUE_THRESHOLD: &str = "LUMEN_HUE_THRESHOLD";

/// Default number of runs compared by trend queries.
pub const DEFAULT_TREND_WINDOW: usize = 10;
/// Default score delta below which two runs count as stable.
pub const DEFAULT_TREND_THRESHOLD: f64 = 5.0;

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Settings for one audit: what to run and how to judge trends.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditConfig {
    pub target_level: ConformanceLevel,
    /// `None` runs every principle.
    pub enabled_principles: Option<Vec<Principle>>,
    pub deficiency_simulation_enabled: bool,
    /// Deficiencies simulated when simulation is enabled.
    pub deficiencies: Vec<Deficiency>,
    pub hue_threshold_degrees: f64,
    pub trend_window: usize,
    pub trend_threshold: f64,
    /// Entry bound of the per-run color parse cache.
    pub parse_cache_capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            target_level: ConformanceLevel::AA,
            enabled_principles: None,
            deficiency_simulation_enabled: true,
            deficiencies: Deficiency::ALL.to_vec(),
            hue_threshold_degrees: DEFAULT_HUE_THRESHOLD,
            trend_window: DEFAULT_TREND_WINDOW,
            trend_threshold: DEFAULT_TREND_THRESHOLD,
            parse_cache_capacity: ParseCache::DEFAULT_CAPACITY,
        }
    }
}

impl AuditConfig {
    #[must_use]
    pub fn with_target_level(mut self, level: ConformanceLevel) -> Self {
        self.target_level = level;
        self
    }

    /// Restrict runs to `principles`.
    #[must_use]
    pub fn with_principles(mut self, principles: impl IntoIterator<Item = Principle>) -> Self {
        let mut list: Vec<Principle> = principles.into_iter().collect();
        list.sort_unstable();
        list.dedup();
        self.enabled_principles = Some(list);
        self
    }

    #[must_use]
    pub fn with_all_principles(mut self) -> Self {
        self.enabled_principles = None;
        self
    }

    #[must_use]
    pub fn with_deficiency_simulation(mut self, enabled: bool) -> Self {
        self.deficiency_simulation_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_deficiencies(mut self, deficiencies: impl IntoIterator<Item = Deficiency>) -> Self {
        self.deficiencies = deficiencies.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_hue_threshold(mut self, degrees: f64) -> Self {
        self.hue_threshold_degrees = degrees;
        self
    }

    #[must_use]
    pub fn with_trend_window(mut self, window: usize) -> Self {
        self.trend_window = window;
        self
    }

    #[must_use]
    pub fn with_trend_threshold(mut self, threshold: f64) -> Self {
        self.trend_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_parse_cache_capacity(mut self, capacity: usize) -> Self {
        self.parse_cache_capacity = capacity;
        self
    }

    /// Principle filter in the form the registry takes.
    #[must_use]
    pub fn principle_filter(&self) -> Option<&[Principle]> {
        self.enabled_principles.as_deref()
    }

    /// Options handed to every check.
    #[must_use]
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            deficiency_simulation_enabled: self.deficiency_simulation_enabled,
            deficiencies: self.deficiencies.clone(),
            hue_threshold: self.hue_threshold_degrees,
        }
    }

    #[must_use]
    pub fn trend_config(&self) -> TrendConfig {
        TrendConfig {
            window: self.trend_window,
            threshold: self.trend_threshold,
        }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, Vec<ConfigError>> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Read overrides through `get_env`, then validate.
    ///
    /// Every malformed variable is reported, not only the first.
    pub fn from_env_with<F>(mut get_env: F) -> Result<Self, Vec<ConfigError>>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get_env(ENV_TARGET_LEVEL) {
            match value.parse() {
                Ok(level) => config.target_level = level,
                Err(_) => errors.push(ConfigError::new(
                    "target_level",
                    value,
                    "expected A|AA|AAA",
                )),
            }
        }

        if let Some(value) = get_env(ENV_PRINCIPLES) {
            let parsed: Result<Vec<Principle>, _> = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<Principle>)
                .collect();
            match parsed {
                Ok(list) => config = config.with_principles(list),
                Err(_) => errors.push(ConfigError::new(
                    "enabled_principles",
                    value,
                    "expected comma list of perceivable|operable|understandable|robust or 1-4",
                )),
            }
        }

        if let Some(value) = get_env(ENV_CVD_SIMULATION) {
            match parse_bool(&value) {
                Some(enabled) => config.deficiency_simulation_enabled = enabled,
                None => errors.push(ConfigError::new(
                    "deficiency_simulation_enabled",
                    value,
                    "expected bool (1/0/true/false/yes/no/on/off)",
                )),
            }
        }

        if let Some(value) = get_env(ENV_TREND_WINDOW) {
            match value.trim().parse() {
                Ok(window) => config.trend_window = window,
                Err(_) => errors.push(ConfigError::new(
                    "trend_window",
                    value,
                    "expected integer",
                )),
            }
        }

        if let Some(value) = get_env(ENV_TREND_THRESHOLD) {
            match value.trim().parse() {
                Ok(threshold) => config.trend_threshold = threshold,
                Err(_) => errors.push(ConfigError::new(
                    "trend_threshold",
                    value,
                    "expected number",
                )),
            }
        }

        if let Some(value) = get_env(ENV_HUE_THRESHOLD) {
            match value.trim().parse() {
                Ok(degrees) => config.hue_threshold_degrees = degrees,
                Err(_) => errors.push(ConfigError::new(
                    "hue_threshold_degrees",
                    value,
                    "expected number",
                )),
            }
        }

        if let Err(invalid) = config.validate() {
            errors.extend(invalid);
        }
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }

    /// Check value constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if matches!(&self.enabled_principles, Some(list) if list.is_empty()) {
            errors.push(ConfigError::new(
                "enabled_principles",
                "",
                "at least one principle must be enabled",
            ));
        }
        if self.deficiency_simulation_enabled && self.deficiencies.is_empty() {
            errors.push(ConfigError::new(
                "deficiencies",
                "",
                "simulation is enabled but no deficiency is selected",
            ));
        }
        if !(self.hue_threshold_degrees > 0.0 && self.hue_threshold_degrees <= 180.0) {
            errors.push(ConfigError::new(
                "hue_threshold_degrees",
                self.hue_threshold_degrees.to_string(),
                "must be in (0, 180]",
            ));
        }
        if self.trend_window < 2 {
            errors.push(ConfigError::new(
                "trend_window",
                self.trend_window.to_string(),
                "must compare at least 2 runs",
            ));
        }
        if !(self.trend_threshold.is_finite() && self.trend_threshold >= 0.0) {
            errors.push(ConfigError::new(
                "trend_threshold",
                self.trend_threshold.to_string(),
                "must be a non-negative number",
            ));
        }
        if self.parse_cache_capacity == 0 {
            errors.push(ConfigError::new(
                "parse_cache_capacity",
                "0",
                "must be positive",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
