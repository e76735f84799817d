//! Row-level behavior of the extension's text functions.

/// A scalar SQL function that maps one text value to another.
///
/// Implementations are pure: the same input always produces the same output
/// for the lifetime of the process.
pub trait TextFunction {
    /// SQL name the function is registered under.
    const NAME: &'static str;

    /// Compute the output for a single non-NULL input row.
    fn apply(input: &str) -> String;
}

/// `duckdb_rdkit(name)`: greets `name`.
pub struct Greeting;

impl TextFunction for Greeting {
    const NAME: &'static str = "duckdb_rdkit";

    fn apply(input: &str) -> String {
        format!("DuckdbRdkit {input} 🐥")
    }
}

/// `duckdb_rdkit_openssl_version(name)`: greets `name` with the version text
/// of the OpenSSL library linked into the extension.
pub struct OpenSslVersion;

impl TextFunction for OpenSslVersion {
    const NAME: &'static str = "duckdb_rdkit_openssl_version";

    fn apply(input: &str) -> String {
        format!(
            "DuckdbRdkit {input}, my linked OpenSSL version is {}",
            openssl::version::version()
        )
    }
}
