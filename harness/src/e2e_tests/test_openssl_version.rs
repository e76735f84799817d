//! `duckdb_rdkit_openssl_version(text)` reports the linked OpenSSL.

use crate::e2e_tests::helpers::{TestEngine, openssl_prefix};

#[test]
fn test_openssl_version_prefix() {
    let test = TestEngine::new();
    let value = test.value("SELECT duckdb_rdkit_openssl_version('Michael') AS value;");
    assert!(value.starts_with(&openssl_prefix()), "unexpected value: {value}");
}

#[test]
fn test_openssl_version_has_version_suffix() {
    let test = TestEngine::new();
    let value = test.value("SELECT duckdb_rdkit_openssl_version('Michael') AS value;");
    let suffix = value.strip_prefix(&openssl_prefix()).unwrap();
    assert!(
        suffix.chars().any(|c| c.is_ascii_digit()),
        "expected a version number after the prefix: {value}"
    );
}

#[test]
fn test_openssl_version_same_for_every_name() {
    let test = TestEngine::new();
    let sam = test.value("SELECT duckdb_rdkit_openssl_version('Sam') AS value");
    let michael = test.value("SELECT duckdb_rdkit_openssl_version('Michael') AS value");
    assert_eq!(
        sam.trim_start_matches("DuckdbRdkit Sam"),
        michael.trim_start_matches("DuckdbRdkit Michael")
    );
}
