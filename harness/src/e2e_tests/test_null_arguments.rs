//! Missing or NULL arguments surface as engine errors or NULLs, never crashes.

use duckdb::types::Value;

use crate::e2e_tests::helpers::TestEngine;
use crate::engine::{EngineError, ResultShapeError};
use crate::scenario::{Expectation, Outcome, Scenario};

#[test]
fn test_null_argument_returns_null() {
    let test = TestEngine::new();
    for sql in [
        "SELECT duckdb_rdkit(NULL) AS value",
        "SELECT duckdb_rdkit_openssl_version(NULL) AS value",
    ] {
        let result = test.query(sql);
        assert_eq!(result.value(0, "value"), Some(&Value::Null), "{sql}");
    }
}

#[test]
fn test_missing_argument_is_query_error() {
    let test = TestEngine::new();
    let session = test.session();
    for sql in [
        "SELECT duckdb_rdkit() AS value",
        "SELECT duckdb_rdkit_openssl_version() AS value",
    ] {
        assert!(
            matches!(session.query(sql), Err(EngineError::Query { .. })),
            "{sql} should fail to bind"
        );
    }
}

#[test]
fn test_null_result_errors_scenario() {
    let test = TestEngine::new();
    let scenario = Scenario::new(
        "null greeting",
        "SELECT duckdb_rdkit(NULL) AS value",
        Expectation::Equals("DuckdbRdkit  🐥".to_string()),
    );

    let Outcome::Errored(EngineError::ResultShape(ResultShapeError::NotText { column, .. })) =
        scenario.run(&test.session())
    else {
        panic!("expected a result shape error");
    };
    assert_eq!(column, "value");
}
