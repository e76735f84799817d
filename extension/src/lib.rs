//! `duckdb_rdkit` DuckDB extension.
//!
//! Registers the extension's scalar functions on a DuckDB connection:
//!
//! - `duckdb_rdkit(VARCHAR) -> VARCHAR`: greets the given name.
//! - `duckdb_rdkit_openssl_version(VARCHAR) -> VARCHAR`: greets the given name
//!   and reports the version of the OpenSSL library the extension links.
//!
//! Built with the `loadable-extension` feature the crate is a loadable
//! extension (`LOAD 'duckdb_rdkit.duckdb_extension'`). With the default
//! `bundled` feature the same registration code runs in-process, which is how
//! the tests exercise it.

#![cfg_attr(test, allow(clippy::disallowed_methods))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod functions;
mod scalar;

#[cfg(feature = "loadable-extension")]
mod entrypoint;

use duckdb::Connection;

pub use functions::{Greeting, OpenSslVersion, TextFunction};
pub use scalar::TextScalar;

/// Register every scalar function of the extension on `conn`.
///
/// Functions are registered on the database instance behind the connection,
/// so they are visible to every other connection of that instance.
///
/// # Errors
///
/// Returns an error if DuckDB rejects a registration, e.g. because a function
/// with the same name and signature already exists.
pub fn register_functions(conn: &Connection) -> duckdb::Result<()> {
    register::<Greeting>(conn)?;
    register::<OpenSslVersion>(conn)?;
    Ok(())
}

fn register<F: TextFunction>(conn: &Connection) -> duckdb::Result<()> {
    conn.register_scalar_function::<TextScalar<F>>(F::NAME)
}
