//! `duckdb_rdkit(text)` returns the greeting for its argument.

use duckdb::types::Value;

use crate::e2e_tests::helpers::TestEngine;

#[test]
fn test_greeting_for_sam() {
    let test = TestEngine::new();
    assert_eq!(
        test.value("SELECT duckdb_rdkit('Sam') AS value;"),
        "DuckdbRdkit Sam 🐥"
    );
}

#[test]
fn test_greeting_result_shape() {
    let test = TestEngine::new();
    let result = test.query("SELECT duckdb_rdkit('Sam') AS value;");

    assert_eq!(result.columns(), ["value"]);
    assert_eq!(result.len(), 1);
    assert_eq!(
        result.rows(),
        [vec![Value::Text("DuckdbRdkit Sam 🐥".to_string())]]
    );
}

#[test]
fn test_greeting_empty_string() {
    let test = TestEngine::new();
    assert_eq!(test.value("SELECT duckdb_rdkit('') AS value"), "DuckdbRdkit  🐥");
}

#[test]
fn test_greeting_over_table_rows() {
    let test = TestEngine::new();
    let result = test.query(
        "SELECT duckdb_rdkit(name) AS value \
         FROM (VALUES (1, 'Ada'), (2, 'Grace'), (3, 'Barbara')) t(i, name) ORDER BY i",
    );

    let values: Vec<&Value> = (0..result.len())
        .filter_map(|row| result.value(row, "value"))
        .collect();
    assert_eq!(
        values,
        [
            &Value::Text("DuckdbRdkit Ada 🐥".to_string()),
            &Value::Text("DuckdbRdkit Grace 🐥".to_string()),
            &Value::Text("DuckdbRdkit Barbara 🐥".to_string()),
        ]
    );
}
