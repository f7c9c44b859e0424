#![forbid(unsafe_code)]

//! Versioned rule registry: Principle → Guideline → Criterion → Check.
//!
//! # Invariants
//!
//! 1. Every check is bound to a criterion that exists in the registry.
//! 2. Check ids are unique.
//! 3. A check's level is never below its criterion's level.
//! 4. `checks_for_level(A) ⊆ checks_for_level(AA) ⊆ checks_for_level(AAA)`.
//! 5. Check order is registration order and never changes after `build`.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Check bound to unknown criterion | `build` fails with `UnknownCriterion` |
//! | Duplicate check id | `build` fails with `DuplicateCheck` |
//! | Check level below criterion level | `build` fails with `LevelBelowCriterion` |
//! | Criterion under unknown guideline | `build` fails with `UnknownGuideline` |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use lumen_core::{ConformanceLevel, CriterionId, GuidelineId, Principle};
use tracing::debug;

use crate::catalog::{CRITERIA, GUIDELINES, WCAG_2_1};
use crate::check::Check;
use crate::checks;

/// Identifies the rule set a registry was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryVersion(pub String);

impl RegistryVersion {
    #[must_use]
    pub fn wcag21() -> Self {
        Self(WCAG_2_1.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    pub level: ConformanceLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guideline {
    pub id: GuidelineId,
    pub name: String,
    /// Criteria in id order.
    pub criteria: Vec<CriterionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    UnknownGuideline {
        criterion: CriterionId,
    },
    DuplicateCriterion(CriterionId),
    UnknownCriterion {
        check: &'static str,
        criterion: CriterionId,
    },
    DuplicateCheck(&'static str),
    LevelBelowCriterion {
        check: &'static str,
        check_level: ConformanceLevel,
        criterion_level: ConformanceLevel,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGuideline { criterion } => {
                write!(f, "criterion {criterion} belongs to an unknown guideline")
            }
            Self::DuplicateCriterion(id) => write!(f, "criterion {id} registered twice"),
            Self::UnknownCriterion { check, criterion } => {
                write!(f, "check {check} is bound to unknown criterion {criterion}")
            }
            Self::DuplicateCheck(id) => write!(f, "check id {id} registered twice"),
            Self::LevelBelowCriterion {
                check,
                check_level,
                criterion_level,
            } => write!(
                f,
                "check {check} has level {check_level} below its criterion's level \
                 {criterion_level}"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Collects guidelines, criteria and checks, validating on [`build`](Self::build).
pub struct RegistryBuilder {
    version: RegistryVersion,
    guidelines: BTreeMap<GuidelineId, Guideline>,
    criteria: BTreeMap<CriterionId, Criterion>,
    checks: Vec<Box<dyn Check>>,
    errors: Vec<RegistryError>,
}

impl RegistryBuilder {
    /// Empty builder for a custom rule set.
    #[must_use]
    pub fn new(version: RegistryVersion) -> Self {
        Self {
            version,
            guidelines: BTreeMap::new(),
            criteria: BTreeMap::new(),
            checks: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Builder preloaded with the full WCAG 2.1 catalog and no checks.
    #[must_use]
    pub fn wcag21() -> Self {
        let mut builder = Self::new(RegistryVersion::wcag21());
        for (id, name) in &GUIDELINES {
            builder = builder.with_guideline(*id, *name);
        }
        for entry in &CRITERIA {
            builder = builder.with_criterion(entry.id, entry.name, entry.level);
        }
        builder
    }

    #[must_use]
    pub fn with_guideline(mut self, id: GuidelineId, name: impl Into<String>) -> Self {
        self.guidelines.entry(id).or_insert_with(|| Guideline {
            id,
            name: name.into(),
            criteria: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn with_criterion(
        mut self,
        id: CriterionId,
        name: impl Into<String>,
        level: ConformanceLevel,
    ) -> Self {
        let Some(guideline) = self.guidelines.get_mut(&id.guideline()) else {
            self.errors
                .push(RegistryError::UnknownGuideline { criterion: id });
            return self;
        };
        if self.criteria.contains_key(&id) {
            self.errors.push(RegistryError::DuplicateCriterion(id));
            return self;
        }
        guideline.criteria.push(id);
        guideline.criteria.sort_unstable();
        self.criteria.insert(
            id,
            Criterion {
                id,
                name: name.into(),
                level,
            },
        );
        self
    }

    /// Bind one check; validation happens in [`build`](Self::build).
    #[must_use]
    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    #[must_use]
    pub fn with_boxed_check(mut self, check: Box<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    #[must_use]
    pub fn with_builtin_checks(mut self) -> Self {
        self.checks.extend(checks::builtin());
        self
    }

    /// Validate every binding. The first problem found is returned.
    pub fn build(self) -> Result<RuleRegistry, RegistryError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        let mut seen = BTreeSet::new();
        for check in &self.checks {
            let id = check.id();
            if !seen.insert(id) {
                return Err(RegistryError::DuplicateCheck(id));
            }
            let Some(criterion) = self.criteria.get(&check.criterion()) else {
                return Err(RegistryError::UnknownCriterion {
                    check: id,
                    criterion: check.criterion(),
                });
            };
            if check.level() < criterion.level {
                return Err(RegistryError::LevelBelowCriterion {
                    check: id,
                    check_level: check.level(),
                    criterion_level: criterion.level,
                });
            }
        }
        debug!(
            version = %self.version,
            criteria = self.criteria.len(),
            checks = self.checks.len(),
            "rule registry built"
        );
        Ok(RuleRegistry {
            version: self.version,
            guidelines: self.guidelines,
            criteria: self.criteria,
            checks: self.checks,
        })
    }
}

/// Immutable, validated rule set.
pub struct RuleRegistry {
    version: RegistryVersion,
    guidelines: BTreeMap<GuidelineId, Guideline>,
    criteria: BTreeMap<CriterionId, Criterion>,
    checks: Vec<Box<dyn Check>>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("version", &self.version)
            .field("criteria", &self.criteria.len())
            .field("checks", &self.checks)
            .finish()
    }
}

impl RuleRegistry {
    /// WCAG 2.1 catalog with every built-in check.
    pub fn wcag21() -> Result<Self, RegistryError> {
        RegistryBuilder::wcag21().with_builtin_checks().build()
    }

    #[must_use]
    pub fn version(&self) -> &RegistryVersion {
        &self.version
    }

    #[must_use]
    pub fn criterion(&self, id: CriterionId) -> Option<&Criterion> {
        self.criteria.get(&id)
    }

    #[must_use]
    pub fn guideline(&self, id: GuidelineId) -> Option<&Guideline> {
        self.guidelines.get(&id)
    }

    /// Principles that have at least one guideline, in WCAG order.
    #[must_use]
    pub fn principles(&self) -> Vec<Principle> {
        let present: BTreeSet<Principle> = self.guidelines.keys().map(|g| g.principle()).collect();
        present.into_iter().collect()
    }

    pub fn guidelines(&self) -> impl Iterator<Item = &Guideline> {
        self.guidelines.values()
    }

    pub fn criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.values()
    }

    /// Criteria a target level is accountable for.
    pub fn criteria_for_level(&self, level: ConformanceLevel) -> impl Iterator<Item = &Criterion> {
        self.criteria.values().filter(move |c| level.admits(c.level))
    }

    pub fn checks(&self) -> impl Iterator<Item = &(dyn Check + 'static)> {
        self.checks.iter().map(|c| c.as_ref())
    }

    /// Every check with level ≤ `level`, in registration order.
    #[must_use]
    pub fn checks_for_level(&self, level: ConformanceLevel) -> Vec<&(dyn Check + 'static)> {
        self.checks_for(level, None)
    }

    /// Like [`checks_for_level`](Self::checks_for_level), restricted to the
    /// given principles when a filter is supplied.
    #[must_use]
    pub fn checks_for(
        &self,
        level: ConformanceLevel,
        principles: Option<&[Principle]>,
    ) -> Vec<&(dyn Check + 'static)> {
        self.checks()
            .filter(|c| level.admits(c.level()))
            .filter(|c| principles.is_none_or(|p| p.contains(&c.criterion().principle())))
            .collect()
    }
}
