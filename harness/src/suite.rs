//! Runs scenarios against a freshly loaded extension.
//!
//! A run has three phases:
//!
//! 1. Setup: open an in-memory engine and load the extension. Any failure
//!    here aborts the run before a single scenario executes.
//! 2. Scenarios: run in declared order on one shared session. A failing or
//!    erroring scenario does not stop the ones after it.
//! 3. Teardown: close the session and the engine. Failures are logged and do
//!    not change the report.

use crate::config::{ConfigError, HarnessConfig};
use crate::engine::{Engine, EngineError, Session};
use crate::scenario::{Outcome, Scenario, default_scenarios};

/// Error that stops a run before any scenario executes.
#[derive(Debug)]
pub enum HarnessError {
    Config(ConfigError),
    Setup(EngineError),
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Setup(e) => write!(f, "setup failed: {e}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Setup(e) => Some(e),
        }
    }
}

impl From<ConfigError> for HarnessError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<EngineError> for HarnessError {
    fn from(e: EngineError) -> Self {
        Self::Setup(e)
    }
}

/// Outcome of one scenario within a run.
#[derive(Debug)]
pub struct ScenarioReport {
    pub name: String,
    pub outcome: Outcome,
}

/// Outcomes of a run, in the order the scenarios were declared.
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.outcome.is_passed()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    /// True when every scenario passed. An empty run is not a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.scenarios.is_empty() && self.failed() == 0
    }

    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.outcome)
    }
}

/// An ordered list of scenarios.
#[derive(Debug, Clone)]
pub struct Suite {
    scenarios: Vec<Scenario>,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new(default_scenarios())
    }
}

impl Suite {
    #[must_use]
    pub const fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Load the extension named by `config` into a fresh engine and run
    /// every scenario against it.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Setup` if the engine cannot be opened or the
    /// extension does not load. Scenario failures are reported, not returned.
    pub fn run(&self, config: &HarnessConfig) -> Result<SuiteReport, HarnessError> {
        let mut engine = Engine::open_in_memory(&config.engine_config())?;
        engine.load_extension(&config.extension_path)?;
        let session = engine.session()?;

        let report = self.run_on(&session);

        if let Err(e) = session.close() {
            tracing::warn!("failed to close session: {e}");
        }
        if let Err(e) = engine.close() {
            tracing::warn!("failed to close engine: {e}");
        }

        Ok(report)
    }

    /// Run every scenario on an already prepared session.
    #[must_use]
    pub fn run_on(&self, session: &Session<'_>) -> SuiteReport {
        let scenarios = self
            .scenarios
            .iter()
            .map(|scenario| {
                let outcome = scenario.run(session);
                log_outcome(scenario, &outcome);
                ScenarioReport {
                    name: scenario.name.clone(),
                    outcome,
                }
            })
            .collect();

        SuiteReport { scenarios }
    }
}

fn log_outcome(scenario: &Scenario, outcome: &Outcome) {
    match outcome {
        Outcome::Passed => tracing::info!("PASS {}", scenario.name),
        Outcome::Failed { actual } => tracing::info!(
            "FAIL {}: expected value {}, got {actual:?}",
            scenario.name,
            scenario.expectation
        ),
        Outcome::Errored(e) => tracing::info!("ERROR {}: {e}", scenario.name),
    }
}
