// Life of a run:
// 1. Read the extension path and engine policy from the environment
// 2. Open an in-memory DuckDB with `allow_unsigned_extensions`
// 3. `LOAD` the extension binary (fatal on failure)
// 4. Run each scenario on one session, recording pass / fail / error
// 5. Close the session and the engine
//
// System components:
//  - Embedded engine (DuckDB)
//  - Scenario definitions
//  - Suite runner
//  - Extension packaging (footer DuckDB requires before `LOAD`)

#![cfg_attr(test, allow(clippy::disallowed_methods, clippy::unwrap_used))]

pub mod config;
pub mod engine;
pub mod package;
pub mod scenario;
pub mod suite;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use config::{ConfigError, HarnessConfig};
pub use engine::{Engine, EngineConfig, EngineError, QueryResult, ResultShapeError, Session};
pub use package::{ExtensionMetadata, PackageError};
pub use scenario::{Expectation, Outcome, Scenario, default_scenarios};
pub use suite::{HarnessError, ScenarioReport, Suite, SuiteReport};
