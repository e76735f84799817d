//! Black-box checks run against a loaded extension.

use crate::engine::{EngineError, Session};

/// Column every scenario reads its answer from.
pub const VALUE_COLUMN: &str = "value";

/// What the text in a scenario's result column must look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Byte-for-byte equality.
    Equals(String),
    /// Only the prefix is pinned; the rest may vary between builds.
    StartsWith(String),
}

impl Expectation {
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Equals(expected) => actual == expected,
            Self::StartsWith(prefix) => actual.starts_with(prefix.as_str()),
        }
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equals(expected) => write!(f, "equal to {expected:?}"),
            Self::StartsWith(prefix) => write!(f, "starting with {prefix:?}"),
        }
    }
}

/// A single SQL statement and the answer it must produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub sql: String,
    pub column: String,
    pub expectation: Expectation,
}

/// Result of running one scenario.
#[derive(Debug)]
pub enum Outcome {
    Passed,
    /// The statement ran but the answer did not match.
    Failed { actual: String },
    /// The statement failed or returned something other than one text value.
    Errored(EngineError),
}

impl Outcome {
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl Scenario {
    /// Scenario reading `VALUE_COLUMN`.
    #[must_use]
    pub fn new(name: impl Into<String>, sql: impl Into<String>, expectation: Expectation) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            column: VALUE_COLUMN.to_string(),
            expectation,
        }
    }

    /// Run the statement on `session` and judge the answer.
    ///
    /// Errors are returned in the outcome rather than raised, so one broken
    /// scenario does not hide the others.
    #[must_use]
    pub fn run(&self, session: &Session<'_>) -> Outcome {
        match self.evaluate(session) {
            Ok(actual) if self.expectation.matches(&actual) => Outcome::Passed,
            Ok(actual) => Outcome::Failed { actual },
            Err(e) => Outcome::Errored(e),
        }
    }

    /// Run the statement and return the text it produced.
    pub fn evaluate(&self, session: &Session<'_>) -> Result<String, EngineError> {
        let result = session.query(&self.sql)?;
        Ok(result.single_text(&self.column)?.to_string())
    }
}

/// The checks every build of the extension must pass.
#[must_use]
pub fn default_scenarios() -> Vec<Scenario> {
    vec![greeting_scenario("Sam"), openssl_version_scenario("Michael")]
}

/// `duckdb_rdkit(name)` must wrap `name` in the extension's greeting.
#[must_use]
pub fn greeting_scenario(name: &str) -> Scenario {
    Scenario::new(
        "duckdb_rdkit returns the greeting",
        format!("SELECT duckdb_rdkit({}) AS value;", sql_string(name)),
        Expectation::Equals(format!("DuckdbRdkit {name} 🐥")),
    )
}

/// `duckdb_rdkit_openssl_version(name)` must report the linked OpenSSL.
///
/// The version text after `OpenSSL` depends on the build environment.
#[must_use]
pub fn openssl_version_scenario(name: &str) -> Scenario {
    Scenario::new(
        "duckdb_rdkit_openssl_version reports the linked OpenSSL",
        format!(
            "SELECT duckdb_rdkit_openssl_version({}) AS value;",
            sql_string(name)
        ),
        Expectation::StartsWith(format!(
            "DuckdbRdkit {name}, my linked OpenSSL version is OpenSSL"
        )),
    )
}

/// Quote `value` as a SQL string literal.
fn sql_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
