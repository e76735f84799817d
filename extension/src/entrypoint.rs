//! C API entry point DuckDB calls on `LOAD`.

#![allow(unsafe_code)]

use std::error::Error;

use duckdb::{Connection, duckdb_entrypoint_c_api};

// Exposes `duckdb_rdkit_init_c_api` in the compiled library. The minimum
// version is also the C API version written into the packaged footer.
#[duckdb_entrypoint_c_api(ext_name = "duckdb_rdkit", min_duckdb_version = "v1.2.0")]
pub fn extension_entrypoint(conn: Connection) -> Result<(), Box<dyn Error>> {
    crate::register_functions(&conn)?;
    Ok(())
}
