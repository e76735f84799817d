//! Embedded DuckDB engine used to host the extension under test.
//!
//! An [`Engine`] is one in-memory database instance. Extensions loaded through
//! it live in that instance's registry and disappear with it, so every run
//! gets a clean engine. [`Session`]s are connections to the same instance and
//! cannot outlive it.
//!
//! All operations are synchronous and report failure through [`EngineError`].

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use duckdb::types::Value;
use duckdb::{Config, Connection, Statement};

/// Engine configuration option relaxing the extension signature policy.
pub const ALLOW_UNSIGNED_EXTENSIONS: &str = "allow_unsigned_extensions";

/// Settings an [`Engine`] is created with.
///
/// The default refuses unsigned extensions. Callers loading locally built
/// binaries must opt in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub allow_unsigned_extensions: bool,
    /// Extra DuckDB options, passed through verbatim.
    pub settings: BTreeMap<String, String>,
}

impl EngineConfig {
    /// Configuration that accepts unsigned extensions.
    #[must_use]
    pub fn allowing_unsigned_extensions() -> Self {
        Self {
            allow_unsigned_extensions: true,
            ..Self::default()
        }
    }

    /// Add a DuckDB option.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// The options as the string key/value mapping DuckDB receives.
    ///
    /// `allow_unsigned_extensions` always comes from the typed field, even if
    /// `settings` carries the same key.
    #[must_use]
    pub fn options(&self) -> BTreeMap<String, String> {
        let mut options = self.settings.clone();
        options.insert(
            ALLOW_UNSIGNED_EXTENSIONS.to_string(),
            self.allow_unsigned_extensions.to_string(),
        );
        options
    }

    fn to_duckdb(&self) -> Result<Config, EngineError> {
        self.options()
            .iter()
            .try_fold(Config::default(), |config, (key, value)| config.with(key, value))
            .map_err(EngineError::Configure)
    }
}

/// Error returned by engine operations.
#[derive(Debug)]
pub enum EngineError {
    /// DuckDB rejected a configuration option.
    Configure(duckdb::Error),
    /// The database instance could not be created.
    Open(duckdb::Error),
    /// A new connection to the instance could not be opened.
    Connect(duckdb::Error),
    /// The extension path is not valid UTF-8 and cannot be put into `LOAD`.
    InvalidPath(PathBuf),
    /// `LOAD` failed: missing file, ABI mismatch, or rejected signature.
    ExtensionLoad { path: PathBuf, source: duckdb::Error },
    /// In-process registration of functions failed.
    Register(duckdb::Error),
    /// A statement failed to prepare or execute.
    Query { sql: String, source: duckdb::Error },
    /// A statement succeeded but its result does not have the expected shape.
    ResultShape(ResultShapeError),
    /// Closing a connection or the instance failed.
    Close(duckdb::Error),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configure(e) => write!(f, "invalid engine configuration: {e}"),
            Self::Open(e) => write!(f, "failed to open database: {e}"),
            Self::Connect(e) => write!(f, "failed to open connection: {e}"),
            Self::InvalidPath(path) => {
                write!(f, "extension path is not valid UTF-8: {}", path.display())
            }
            Self::ExtensionLoad { path, source } => {
                write!(f, "failed to load extension '{}': {source}", path.display())
            }
            Self::Register(e) => write!(f, "failed to register functions: {e}"),
            Self::Query { sql, source } => write!(f, "query failed ({sql}): {source}"),
            Self::ResultShape(e) => write!(f, "unexpected result: {e}"),
            Self::Close(e) => write!(f, "failed to close database: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configure(e)
            | Self::Open(e)
            | Self::Connect(e)
            | Self::Register(e)
            | Self::Close(e)
            | Self::ExtensionLoad { source: e, .. }
            | Self::Query { source: e, .. } => Some(e),
            Self::ResultShape(e) => Some(e),
            Self::InvalidPath(_) => None,
        }
    }
}

impl From<ResultShapeError> for EngineError {
    fn from(e: ResultShapeError) -> Self {
        Self::ResultShape(e)
    }
}

/// A query result that does not match what the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultShapeError {
    RowCount { expected: usize, actual: usize },
    MissingColumn(String),
    /// The column holds NULL or a non-text value, rendered with `Debug`.
    NotText { column: String, value: String },
}

impl std::fmt::Display for ResultShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowCount { expected, actual } => {
                write!(f, "expected {expected} row(s), got {actual}")
            }
            Self::MissingColumn(name) => write!(f, "no column named '{name}'"),
            Self::NotText { column, value } => {
                write!(f, "column '{column}' is not text: {value}")
            }
        }
    }
}

impl std::error::Error for ResultShapeError {}

/// Rows returned by a statement, with column names in projection order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl QueryResult {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// The text in `column` of the only row.
    ///
    /// # Errors
    ///
    /// Fails unless there is exactly one row, the column exists and it holds
    /// non-NULL text.
    pub fn single_text(&self, column: &str) -> Result<&str, ResultShapeError> {
        if self.rows.len() != 1 {
            return Err(ResultShapeError::RowCount {
                expected: 1,
                actual: self.rows.len(),
            });
        }
        let value = self
            .value(0, column)
            .ok_or_else(|| ResultShapeError::MissingColumn(column.to_string()))?;
        match value {
            Value::Text(text) => Ok(text),
            other => Err(ResultShapeError::NotText {
                column: column.to_string(),
                value: format!("{other:?}"),
            }),
        }
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }
}

/// An in-memory DuckDB instance.
pub struct Engine {
    connection: Connection,
    loaded_extensions: Vec<PathBuf>,
}

impl Engine {
    /// Create a fresh in-memory instance.
    pub fn open_in_memory(config: &EngineConfig) -> Result<Self, EngineError> {
        let connection =
            Connection::open_in_memory_with_flags(config.to_duckdb()?).map_err(EngineError::Open)?;

        tracing::info!(
            allow_unsigned_extensions = config.allow_unsigned_extensions,
            "opened in-memory database"
        );

        Ok(Self {
            connection,
            loaded_extensions: Vec::new(),
        })
    }

    /// Load the extension binary at `path` into this instance.
    ///
    /// The path goes to `LOAD` unchanged apart from quoting; whether it exists
    /// and is a loadable library is for the engine to decide.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ExtensionLoad` when the engine refuses the binary.
    pub fn load_extension(&mut self, path: &Path) -> Result<(), EngineError> {
        let sql = load_statement(path)?;
        tracing::debug!("{sql}");

        self.connection
            .execute_batch(&sql)
            .map_err(|source| EngineError::ExtensionLoad {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("loaded extension '{}'", path.display());
        self.loaded_extensions.push(path.to_path_buf());
        Ok(())
    }

    /// Register functions in-process through `register`, bypassing `LOAD`.
    pub fn register_with<F>(&self, register: F) -> Result<(), EngineError>
    where
        F: FnOnce(&Connection) -> duckdb::Result<()>,
    {
        register(&self.connection).map_err(EngineError::Register)
    }

    /// Extensions loaded through [`Engine::load_extension`], in load order.
    #[must_use]
    pub fn loaded_extensions(&self) -> &[PathBuf] {
        &self.loaded_extensions
    }

    /// Open a new connection to this instance.
    pub fn session(&self) -> Result<Session<'_>, EngineError> {
        let connection = self.connection.try_clone().map_err(EngineError::Connect)?;
        Ok(Session {
            connection,
            _engine: PhantomData,
        })
    }

    /// Run `sql` on the engine's own connection.
    pub fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        run_query(&self.connection, sql)
    }

    /// Platform this DuckDB build loads extensions for, e.g. `linux_amd64`.
    pub fn platform(&self) -> Result<String, EngineError> {
        let result = self.query("SELECT platform FROM pragma_platform()")?;
        Ok(result.single_text("platform")?.to_string())
    }

    /// Close the instance, releasing everything loaded into it.
    pub fn close(self) -> Result<(), EngineError> {
        self.connection
            .close()
            .map_err(|(_, source)| EngineError::Close(source))?;
        tracing::info!("closed database");
        Ok(())
    }
}

/// A connection to an [`Engine`].
pub struct Session<'engine> {
    connection: Connection,
    _engine: PhantomData<&'engine Engine>,
}

impl Session<'_> {
    /// Run `sql` and collect every row.
    pub fn query(&self, sql: &str) -> Result<QueryResult, EngineError> {
        run_query(&self.connection, sql)
    }

    pub fn close(self) -> Result<(), EngineError> {
        self.connection
            .close()
            .map_err(|(_, source)| EngineError::Close(source))
    }
}

fn run_query(connection: &Connection, sql: &str) -> Result<QueryResult, EngineError> {
    tracing::debug!("{sql}");
    let query_error = |source| EngineError::Query {
        sql: sql.to_string(),
        source,
    };

    let mut statement = connection.prepare(sql).map_err(query_error)?;
    let mut rows = statement.query([]).map_err(query_error)?;
    let columns = rows.as_ref().map(Statement::column_names).unwrap_or_default();

    let mut collected = Vec::new();
    while let Some(row) = rows.next().map_err(query_error)? {
        let values = (0..columns.len())
            .map(|index| row.get::<_, Value>(index))
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;
        collected.push(values);
    }

    Ok(QueryResult {
        columns,
        rows: collected,
    })
}

/// Build the `LOAD` statement for `path`, doubling embedded single quotes.
fn load_statement(path: &Path) -> Result<String, EngineError> {
    let path = path
        .to_str()
        .ok_or_else(|| EngineError::InvalidPath(path.to_path_buf()))?;
    Ok(format!("LOAD '{}';", path.replace('\'', "''")))
}
