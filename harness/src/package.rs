//! Turns a compiled extension library into a file DuckDB will `LOAD`.
//!
//! DuckDB reads a fixed-size footer from the end of every extension file:
//!
//! ```text
//! +----------------------------+
//! | shared library bytes       |
//! +----------------------------+
//! | custom section header (22) |  wasm-style `duckdb_signature` section
//! +----------------------------+
//! | 8 metadata fields (8 x 32) |  zero-padded, written last-field-first
//! +----------------------------+
//! | signature (256)            |  all zeros: the file is unsigned
//! +----------------------------+
//! ```
//!
//! The engine reads the fields back in reverse, so field 0 is the magic
//! value, then platform, C API version, extension version and ABI type. The
//! remaining three are unused.

use std::path::{Path, PathBuf};

/// File name DuckDB derives the `duckdb_rdkit_init_c_api` symbol from.
pub const EXTENSION_FILE_NAME: &str = "duckdb_rdkit.duckdb_extension";

/// C API version the entry point asks DuckDB for.
pub const CAPI_VERSION: &str = "v1.2.0";

const FIELD_SIZE: usize = 32;
const FIELD_COUNT: usize = 8;
const SIGNATURE_SIZE: usize = 256;

/// Bytes DuckDB reads from the end of the file.
pub const FOOTER_SIZE: usize = FIELD_SIZE * FIELD_COUNT + SIGNATURE_SIZE;

const SECTION_HEADER: &[u8] = b"\x00\x93\x04\x10duckdb_signature\x80\x04";
const MAGIC: &str = "4";
const ABI_TYPE: &str = "C_STRUCT";

/// Bytes [`package`] appends to the library.
pub const APPENDED_SIZE: usize = SECTION_HEADER.len() + FOOTER_SIZE;

/// Metadata written into the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMetadata {
    /// Must equal the loading engine's platform.
    pub platform: String,
    pub extension_version: String,
    pub capi_version: String,
}

impl ExtensionMetadata {
    /// Metadata for this crate's version, built for `platform`.
    #[must_use]
    pub fn for_platform(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            extension_version: format!("v{}", env!("CARGO_PKG_VERSION")),
            capi_version: CAPI_VERSION.to_string(),
        }
    }

    /// Section header, metadata fields and an empty signature.
    pub fn footer(&self) -> Result<Vec<u8>, PackageError> {
        // Write order; DuckDB reverses it on read.
        let fields = [
            ("unused", ""),
            ("unused", ""),
            ("unused", ""),
            ("abi_type", ABI_TYPE),
            ("extension_version", self.extension_version.as_str()),
            ("capi_version", self.capi_version.as_str()),
            ("platform", self.platform.as_str()),
            ("magic", MAGIC),
        ];

        let mut footer = Vec::with_capacity(APPENDED_SIZE);
        footer.extend_from_slice(SECTION_HEADER);
        for (name, value) in fields {
            if value.len() > FIELD_SIZE {
                return Err(PackageError::FieldTooLong {
                    field: name,
                    value: value.to_string(),
                });
            }
            let start = footer.len();
            footer.extend_from_slice(value.as_bytes());
            footer.resize(start + FIELD_SIZE, 0);
        }
        footer.resize(APPENDED_SIZE, 0);
        Ok(footer)
    }
}

/// Error returned while packaging an extension.
#[derive(Debug)]
pub enum PackageError {
    /// A metadata value does not fit its 32-byte field.
    FieldTooLong { field: &'static str, value: String },
    Io { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for PackageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldTooLong { field, value } => {
                write!(f, "{field} '{value}' is longer than {FIELD_SIZE} bytes")
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for PackageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FieldTooLong { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Copy `library` into `out_dir` as [`EXTENSION_FILE_NAME`] with the footer
/// appended, returning the path of the new file.
pub fn package(
    library: &Path,
    out_dir: &Path,
    metadata: &ExtensionMetadata,
) -> Result<PathBuf, PackageError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| PackageError::Io { path, source }
    };

    let mut bytes = std::fs::read(library).map_err(io_error(library))?;
    bytes.extend_from_slice(&metadata.footer()?);

    std::fs::create_dir_all(out_dir).map_err(io_error(out_dir))?;
    let target = out_dir.join(EXTENSION_FILE_NAME);
    std::fs::write(&target, bytes).map_err(io_error(&target))?;

    tracing::info!(
        platform = %metadata.platform,
        "packaged '{}' as '{}'",
        library.display(),
        target.display()
    );
    Ok(target)
}
