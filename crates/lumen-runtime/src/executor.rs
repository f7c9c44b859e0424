#![forbid(unsafe_code)]

//! Validation executor: elements × checks → scored [`Run`].
//!
//! # State Machine
//!
//! ```text
//! Idle ──► Collecting ──► Executing ──► Aggregating ──► Done
//!               │
//!               └──► Failed      (port fault or malformed context)
//! ```
//!
//! Collecting inspects every element once and resolves its colors into the
//! per-run [`RunContext`]. Executing walks the collected elements in order and
//! runs every admitted check against each. Observer callbacks and the cancel
//! check happen at element boundaries while collecting, before the port is
//! queried; once cancelled the port is not called again, and the elements
//! already gathered are still executed and scored.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Run already in flight on this executor | `RunFailure::Busy`, nothing else happens |
//! | Port returns `Err` | `RunFailure::Inspection`, phase `Failed` |
//! | Context for the wrong handle / bad font size | `RunFailure::MalformedContext` |
//! | Check returns `Err` or panics | one error finding, counted as failed, run continues |
//! | Color string does not parse | check reports not applicable |
//! | Cancelled | `Ok(Run)` with `Incomplete { evaluated, total }` |

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use lumen_color::{CacheStats, ParseCache};
use lumen_core::{
    ConformanceLevel, CriterionId, ElementHandle, Finding, FindingDetail, InspectionContext,
    InspectionPort, PortError, Run, RunCompleteness, SuiteResult, Timestamp,
};
use lumen_rules::{
    Check, CheckInput, CheckOutcome, Evaluation, RegistryError, ResolvedStyle, RuleRegistry,
};
use tracing::{debug, info, info_span, warn};

use crate::aggregate::Aggregator;
use crate::config::{AuditConfig, ConfigError};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    Idle,
    Collecting,
    Executing,
    Aggregating,
    Done,
    Failed,
}

impl RunPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Collecting => "collecting",
            Self::Executing => "executing",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress hooks, called synchronously on the running thread.
pub trait RunObserver {
    fn on_phase(&self, phase: RunPhase) {
        let _ = phase;
    }

    /// Called before element `index` of `total` is inspected.
    fn on_element(&self, index: usize, total: usize) {
        let _ = (index, total);
    }
}

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Per-call options for [`Executor::run_with`].
#[derive(Default)]
pub struct RunOptions<'a> {
    pub cancel: Option<CancelToken>,
    pub observer: Option<&'a dyn RunObserver>,
    /// Fixed run timestamp; defaults to the current time.
    pub timestamp: Option<Timestamp>,
}

impl<'a> RunOptions<'a> {
    #[must_use]
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn RunObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

impl fmt::Debug for RunOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("cancel", &self.cancel)
            .field("observer", &self.observer.is_some())
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/// Why a run produced no [`Run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunFailure {
    /// Another run is in flight on the same executor.
    Busy,
    /// The inspection port failed for one element.
    Inspection {
        port: String,
        element: ElementHandle,
        operation: String,
        source: PortError,
    },
    /// The port answered with a context that cannot describe the element.
    MalformedContext {
        element: ElementHandle,
        reason: String,
    },
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("a validation run is already in progress"),
            Self::Inspection {
                port,
                element,
                operation,
                source,
            } => write!(
                f,
                "{port} port failed during {operation} of {element}: {}",
                source.reason
            ),
            Self::MalformedContext { element, reason } => {
                write!(f, "malformed context for {element}: {reason}")
            }
        }
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Inspection { source, .. } => Some(source),
            Self::Busy | Self::MalformedContext { .. } => None,
        }
    }
}

/// One inspected element with its colors resolved.
#[derive(Debug, Clone)]
pub struct ElementState {
    pub context: InspectionContext,
    pub style: ResolvedStyle,
}

/// State owned by exactly one run.
#[derive(Debug)]
pub struct RunContext {
    cache: ParseCache,
    elements: Vec<ElementState>,
    requested: usize,
}

impl RunContext {
    /// Inspect every element once and resolve its colors.
    ///
    /// Stops before the next element once `options.cancel` is set; the
    /// context then holds only the elements gathered so far.
    pub fn collect<P: InspectionPort + ?Sized>(
        port: &P,
        elements: &[ElementHandle],
        cache_capacity: usize,
        options: &RunOptions<'_>,
    ) -> Result<Self, RunFailure> {
        let total = elements.len();
        let mut cache = ParseCache::with_capacity(cache_capacity);
        let mut states = Vec::with_capacity(total);
        for (index, &element) in elements.iter().enumerate() {
            if let Some(observer) = options.observer {
                observer.on_element(index, total);
            }
            if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                info!(collected = index, total, "run cancelled");
                break;
            }
            let context = port
                .inspect(element)
                .map_err(|source| RunFailure::Inspection {
                    port: port.name().to_string(),
                    element,
                    operation: source.operation.clone(),
                    source,
                })?;
            if let Some(reason) = context.malformation(element) {
                return Err(RunFailure::MalformedContext { element, reason });
            }
            let style = ResolvedStyle::resolve(&context, &mut cache);
            states.push(ElementState { context, style });
        }
        Ok(Self {
            cache,
            elements: states,
            requested: total,
        })
    }

    #[must_use]
    pub fn elements(&self) -> &[ElementState] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// How many elements the run was asked to cover.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    #[must_use]
    pub fn completeness(&self) -> RunCompleteness {
        if self.elements.len() < self.requested {
            RunCompleteness::Incomplete {
                evaluated: self.elements.len(),
                total: self.requested,
            }
        } else {
            RunCompleteness::Complete
        }
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs registry checks against host elements.
///
/// `Executor` is `Sync` when its port is; a second concurrent run on the same
/// executor is rejected with [`RunFailure::Busy`].
pub struct Executor<P> {
    port: P,
    registry: Arc<RuleRegistry>,
    config: AuditConfig,
    busy: AtomicBool,
    phase: Mutex<RunPhase>,
}

impl<P> fmt::Debug for Executor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("registry", &self.registry.version())
            .field("config", &self.config)
            .field("phase", &self.phase())
            .finish()
    }
}

impl<P> Executor<P> {
    /// Current phase of the latest run.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    #[must_use]
    pub fn port(&self) -> &P {
        &self.port
    }

    fn enter(&self, phase: RunPhase, observer: Option<&dyn RunObserver>) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
        debug!(%phase, "run phase");
        if let Some(observer) = observer {
            observer.on_phase(phase);
        }
    }
}

impl<P: InspectionPort> Executor<P> {
    #[must_use]
    pub fn new(port: P, registry: Arc<RuleRegistry>) -> Self {
        Self {
            port,
            registry,
            config: AuditConfig::default(),
            busy: AtomicBool::new(false),
            phase: Mutex::new(RunPhase::Idle),
        }
    }

    /// Executor over the WCAG 2.1 registry with every built-in check.
    pub fn wcag21(port: P) -> Result<Self, RegistryError> {
        Ok(Self::new(port, Arc::new(RuleRegistry::wcag21()?)))
    }

    /// Replace the configuration after [`AuditConfig::validate`] accepts it.
    pub fn with_config(mut self, config: AuditConfig) -> Result<Self, Vec<ConfigError>> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Run at the configured target level.
    pub fn audit(&self, elements: &[ElementHandle]) -> Result<Run, RunFailure> {
        self.run(elements, self.config.target_level)
    }

    pub fn run(
        &self,
        elements: &[ElementHandle],
        level: ConformanceLevel,
    ) -> Result<Run, RunFailure> {
        self.run_with(elements, level, RunOptions::default())
    }

    pub fn run_with(
        &self,
        elements: &[ElementHandle],
        level: ConformanceLevel,
        options: RunOptions<'_>,
    ) -> Result<Run, RunFailure> {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            warn!("run rejected: executor busy");
            return Err(RunFailure::Busy);
        };
        let span = info_span!("lumen.run", %level, elements = elements.len());
        let _enter = span.enter();
        let started = web_time::Instant::now();
        let observer = options.observer;

        self.enter(RunPhase::Collecting, observer);
        let context = match RunContext::collect(
            &self.port,
            elements,
            self.config.parse_cache_capacity,
            &options,
        ) {
            Ok(context) => context,
            Err(failure) => {
                self.enter(RunPhase::Failed, observer);
                warn!(error = %failure, "run failed");
                return Err(failure);
            }
        };

        self.enter(RunPhase::Executing, observer);
        let checks = self.registry.checks_for(level, self.config.principle_filter());
        let check_options = self.config.check_options();
        let mut suites: BTreeMap<CriterionId, SuiteResult> = checks
            .iter()
            .map(|c| (c.criterion(), SuiteResult::new(c.criterion())))
            .collect();
        for element in context.elements() {
            let input = CheckInput {
                context: &element.context,
                style: &element.style,
                level,
                options: &check_options,
            };
            for &check in &checks {
                let suite = suites
                    .entry(check.criterion())
                    .or_insert_with(|| SuiteResult::new(check.criterion()));
                evaluate_into(check, &input, suite);
            }
        }
        let completeness = context.completeness();

        self.enter(RunPhase::Aggregating, observer);
        let run = Aggregator::new()
            .with_principles(self.config.principle_filter())
            .aggregate(
                options.timestamp.unwrap_or_else(Timestamp::now),
                level,
                suites.into_values().collect(),
                completeness,
            );
        let cache = context.cache_stats();
        info!(
            score = run.overall_score,
            findings = run.findings.len(),
            checks = checks.len(),
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run complete"
        );
        self.enter(RunPhase::Done, observer);
        Ok(run)
    }
}

/// Evaluate one check against one element and fold the result into `suite`.
fn evaluate_into(check: &dyn Check, input: &CheckInput<'_>, suite: &mut SuiteResult) {
    let result = catch_unwind(AssertUnwindSafe(|| {
        check
            .applies_to(input)
            .then(|| check.evaluate(input))
    }));
    match result {
        Ok(None) => {}
        Ok(Some(Ok(Evaluation::Outcome(outcome)))) => record(suite, outcome),
        Ok(Some(Ok(Evaluation::NotApplicable))) => suite.not_applicable += 1,
        Ok(Some(Err(err))) => record_fault(check, input, suite, err.reason),
        Err(payload) => {
            let reason = format!("panicked: {}", panic_message(&*payload));
            record_fault(check, input, suite, reason);
        }
    }
}

fn record(suite: &mut SuiteResult, outcome: CheckOutcome) {
    if outcome.passed {
        suite.passed += 1;
    } else {
        suite.failed += 1;
    }
    for finding in outcome.issues.into_iter().chain(outcome.warnings) {
        suite.push_finding(finding);
    }
}

fn record_fault(
    check: &dyn Check,
    input: &CheckInput<'_>,
    suite: &mut SuiteResult,
    reason: String,
) {
    warn!(check = check.id(), element = %input.element(), %reason, "check fault");
    suite.failed += 1;
    suite.push_finding(
        Finding::error(
            input.element(),
            check.criterion(),
            check.id(),
            format!("check {} could not evaluate this element: {reason}", check.id()),
        )
        .with_details(FindingDetail::CheckFault {
            check: check.id().to_string(),
            reason,
        }),
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::StaticInspector;
    use lumen_core::{Principle, Severity};

    fn text(id: u64, fg: &str) -> InspectionContext {
        InspectionContext::new(ElementHandle(id))
            .with_text("Hello")
            .with_foreground(fg)
            .with_background("#ffffff")
    }

    fn executor(contexts: Vec<InspectionContext>) -> Executor<StaticInspector> {
        Executor::wcag21(StaticInspector::from_contexts(contexts)).unwrap()
    }

    #[test]
    fn phases_advance_to_done() {
        let exec = executor(vec![text(1, "#000")]);
        assert_eq!(exec.phase(), RunPhase::Idle);
        exec.run(&[ElementHandle(1)], ConformanceLevel::AA).unwrap();
        assert_eq!(exec.phase(), RunPhase::Done);
    }

    #[test]
    fn port_fault_fails_the_run() {
        let port = StaticInspector::new()
            .with_context(text(1, "#000"))
            .with_fault(ElementHandle(2), "detached");
        let exec = Executor::wcag21(port).unwrap();
        let err = exec
            .run(&[ElementHandle(1), ElementHandle(2)], ConformanceLevel::AA)
            .unwrap_err();
        match &err {
            RunFailure::Inspection {
                port,
                element,
                operation,
                ..
            } => {
                assert_eq!(port, "static");
                assert_eq!(*element, ElementHandle(2));
                assert_eq!(operation, "inspect");
            }
            other => panic!("unexpected failure {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(exec.phase(), RunPhase::Failed);
    }

    #[test]
    fn malformed_context_fails_the_run() {
        let exec = executor(vec![text(1, "#000").with_font(f32::NAN, 400)]);
        let err = exec.run(&[ElementHandle(1)], ConformanceLevel::AA).unwrap_err();
        assert!(matches!(err, RunFailure::MalformedContext { element: ElementHandle(1), .. }));
    }

    #[test]
    fn unparseable_color_counts_as_not_applicable() {
        let exec = executor(vec![text(1, "not-a-color")]);
        let run = exec.run(&[ElementHandle(1)], ConformanceLevel::AA).unwrap();
        let suite = run
            .suites
            .iter()
            .find(|s| s.criterion == CriterionId::of(1, 4, 3))
            .unwrap();
        assert_eq!(suite.not_applicable, 1);
        assert!(suite.is_vacuous());
    }

    #[test]
    fn principle_filter_limits_checks_and_categories() {
        let exec = executor(vec![text(1, "#777777")])
            .with_config(AuditConfig::default().with_principles([Principle::Robust]))
            .unwrap();
        let run = exec.audit(&[ElementHandle(1)]).unwrap();
        assert_eq!(run.category_scores.len(), 1);
        assert!(run.findings.iter().all(|f| f.criterion.principle() == Principle::Robust));
        assert!(run.suites.iter().all(|s| s.criterion.principle() == Principle::Robust));
    }

    #[test]
    fn run_context_caches_repeated_colors() {
        let port = StaticInspector::from_contexts((1..=3).map(|i| text(i, "#333")));
        let handles = port.handles();
        let context = RunContext::collect(&port, &handles, 16, &RunOptions::default()).unwrap();
        assert_eq!(context.len(), 3);
        assert_eq!(context.completeness(), RunCompleteness::Complete);
        let stats = context.cache_stats();
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.hits, 4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let errors = executor(vec![text(1, "#000")])
            .with_config(AuditConfig::default().with_principles([]))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "enabled_principles");
    }

    #[test]
    fn cancelled_collect_skips_the_port() {
        let port = StaticInspector::new().with_fault(ElementHandle(1), "detached");
        let token = CancelToken::new();
        token.cancel();
        let options = RunOptions::default().with_cancel(token);
        let context = RunContext::collect(&port, &[ElementHandle(1)], 16, &options).unwrap();
        assert!(context.is_empty());
        assert_eq!(
            context.completeness(),
            RunCompleteness::Incomplete {
                evaluated: 0,
                total: 1
            }
        );
    }

    #[test]
    fn findings_carry_severity_and_check_ids() {
        let exec = executor(vec![text(1, "#777777")]);
        let run = exec.run(&[ElementHandle(1)], ConformanceLevel::AA).unwrap();
        let errors: Vec<&Finding> = run.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].check, "text-contrast-minimum");
        assert_eq!(errors[0].severity, Severity::Error);
    }
}
