//! End-to-end tests at the SQL level.
//!
//! Each test file covers a specific scenario. Most run against an engine with
//! the extension registered in-process; `test_extension_binary` builds and
//! packages the real binary (or takes `DUCKDB_RDKIT_EXTENSION_BINARY_PATH`)
//! and loads it through `LOAD`.

#![cfg(test)]


mod test_extension_binary;
mod test_greeting;
mod test_null_arguments;
mod test_openssl_version;
