// system-tests/src/runner.rs
// ============================================================================
// Module: Scenario Runner
// Description: Given/When/Then scenario model and sequential executor.
// Purpose: Run acceptance scenarios one at a time and report every step.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! A [`Feature`] is an ordered list of [`Scenario`]s, each an ordered list of
//! [`Step`]s. [`run_feature`] executes scenarios sequentially with a fresh
//! [`World`] per scenario. The first failing step fails its scenario and the
//! remaining steps are reported as skipped; later scenarios still run.
//! [`run`] wraps setup and execution: a setup failure returns before any
//! scenario starts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use data_platform_client::Exchange;
use data_platform_config::EnvSource;
use serde::Serialize;
use tracing::error;
use tracing::info;

use crate::config::SuiteSettings;
use crate::context::SuiteContext;
use crate::context::World;
use crate::error::StepError;
use crate::error::SuiteError;

// ============================================================================
// SECTION: Step Model
// ============================================================================

/// Result of a single step.
pub type StepResult = Result<(), StepError>;

/// Boxed future returned by a step function.
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = StepResult> + 'a>>;

/// Step implementation over a scenario's world.
pub type StepFn = for<'a> fn(&'a mut World) -> StepFuture<'a>;

/// Gherkin step keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Keyword {
    /// Precondition.
    Given,
    /// Action.
    When,
    /// Expected outcome.
    Then,
    /// Continuation of the previous keyword.
    And,
}

impl Keyword {
    /// Returns the keyword as written in feature text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a scenario.
#[derive(Clone, Copy)]
pub struct Step {
    /// Keyword shown in reports.
    pub keyword: Keyword,
    /// Step text shown in reports.
    pub text: &'static str,
    /// Step implementation.
    pub run: StepFn,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("keyword", &self.keyword).field("text", &self.text).finish()
    }
}

/// Named sequence of steps.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario title.
    pub name: &'static str,
    /// Steps in execution order.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Creates an empty scenario.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn step(mut self, keyword: Keyword, text: &'static str, run: StepFn) -> Self {
        self.steps.push(Step {
            keyword,
            text,
            run,
        });
        self
    }

    /// Appends a `Given` step.
    #[must_use]
    pub fn given(self, text: &'static str, run: StepFn) -> Self {
        self.step(Keyword::Given, text, run)
    }

    /// Appends a `When` step.
    #[must_use]
    pub fn when(self, text: &'static str, run: StepFn) -> Self {
        self.step(Keyword::When, text, run)
    }

    /// Appends a `Then` step.
    #[must_use]
    pub fn then(self, text: &'static str, run: StepFn) -> Self {
        self.step(Keyword::Then, text, run)
    }

    /// Appends an `And` step.
    #[must_use]
    pub fn and(self, text: &'static str, run: StepFn) -> Self {
        self.step(Keyword::And, text, run)
    }
}

/// Named collection of scenarios.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature title.
    pub name: &'static str,
    /// Scenarios in execution order.
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Creates an empty feature.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            scenarios: Vec::new(),
        }
    }

    /// Appends a scenario.
    #[must_use]
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Step completed.
    Passed,
    /// Step failed with the given message.
    Failed(String),
    /// Step did not run because an earlier step failed.
    Skipped,
}

/// Report line for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Step keyword.
    pub keyword: Keyword,
    /// Step text.
    pub text: String,
    /// Step outcome.
    pub outcome: StepOutcome,
}

/// Report for one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Scenario title.
    pub name: String,
    /// Step reports in execution order.
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    /// Returns true when no step failed.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.steps.iter().any(|step| matches!(step.outcome, StepOutcome::Failed(_)))
    }

    /// Returns the failure message of the failing step, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.steps.iter().find_map(|step| match &step.outcome {
            StepOutcome::Failed(message) => Some(message.as_str()),
            StepOutcome::Passed | StepOutcome::Skipped => None,
        })
    }
}

/// Report for one feature run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Feature title.
    pub feature: String,
    /// Scenario reports in execution order.
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Returns the number of passed scenarios.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.scenarios.iter().filter(|scenario| scenario.passed()).count()
    }

    /// Returns the number of failed scenarios.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.scenarios.len() - self.passed_count()
    }

    /// Returns true when every scenario passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Returns the report for the named scenario.
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }

    /// Logs a one-line summary plus each failing scenario.
    pub fn log_summary(&self) {
        for scenario in self.scenarios.iter().filter(|scenario| !scenario.passed()) {
            error!(
                scenario = scenario.name.as_str(),
                error = scenario.failure().unwrap_or_default(),
                "scenario failed"
            );
        }
        info!(
            feature = self.feature.as_str(),
            passed = self.passed_count(),
            failed = self.failed_count(),
            "acceptance run finished"
        );
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Outcome of a full suite run.
#[derive(Debug, Clone)]
pub struct SuiteRun {
    /// Scenario results.
    pub report: SuiteReport,
    /// HTTP exchanges issued during the run.
    pub transcript: Vec<Exchange>,
}

/// Sets up the suite and runs `feature`.
///
/// # Errors
///
/// Returns a [`SuiteError`] when setup fails; no scenario runs in that case.
pub async fn run<E: EnvSource>(
    settings: &SuiteSettings,
    env: E,
    feature: &Feature,
    filter: Option<&str>,
) -> Result<SuiteRun, SuiteError> {
    let context = Arc::new(SuiteContext::setup(settings, env)?);
    let report = run_feature(&context, feature, filter).await;
    Ok(SuiteRun {
        report,
        transcript: context.client.transcript(),
    })
}

/// Runs the scenarios of `feature` whose name contains `filter`.
pub async fn run_feature(
    context: &Arc<SuiteContext>,
    feature: &Feature,
    filter: Option<&str>,
) -> SuiteReport {
    info!(feature = feature.name, "feature started");
    let mut scenarios = Vec::with_capacity(feature.scenarios.len());
    for scenario in &feature.scenarios {
        if filter.is_some_and(|filter| !scenario.name.contains(filter)) {
            continue;
        }
        scenarios.push(run_scenario(context, scenario).await);
    }
    SuiteReport {
        feature: feature.name.to_string(),
        scenarios,
    }
}

/// Runs one scenario with fresh state.
async fn run_scenario(context: &Arc<SuiteContext>, scenario: &Scenario) -> ScenarioReport {
    info!(scenario = scenario.name, "scenario started");
    let mut world = World::new(Arc::clone(context));
    let mut failed = false;
    let mut steps = Vec::with_capacity(scenario.steps.len());
    for step in &scenario.steps {
        let outcome = if failed {
            StepOutcome::Skipped
        } else {
            match (step.run)(&mut world).await {
                Ok(()) => {
                    info!(keyword = step.keyword.as_str(), step = step.text, "step passed");
                    StepOutcome::Passed
                }
                Err(err) => {
                    failed = true;
                    error!(
                        keyword = step.keyword.as_str(),
                        step = step.text,
                        error = %err,
                        "step failed"
                    );
                    StepOutcome::Failed(err.to_string())
                }
            }
        };
        steps.push(StepReport {
            keyword: step.keyword,
            text: step.text.to_string(),
            outcome,
        });
    }
    ScenarioReport {
        name: scenario.name.to_string(),
        steps,
    }
}
