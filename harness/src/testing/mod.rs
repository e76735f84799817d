use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use crate::engine::{Engine, EngineConfig, EngineError};
use crate::package::{ExtensionMetadata, package};

/// Create an in-memory engine with the extension's functions registered
/// in-process, as if the binary had been loaded.
pub fn new_test_engine() -> Result<Engine, EngineError> {
    let engine = Engine::open_in_memory(&EngineConfig::default())?;
    engine.register_with(duckdb_rdkit::register_functions)?;
    Ok(engine)
}

/// Path of a packaged extension binary.
///
/// Uses `DUCKDB_RDKIT_EXTENSION_BINARY_PATH` when set. Otherwise builds the
/// `duckdb_rdkit` cdylib with `loadable-extension` into its own target
/// directory and packages it for the host platform, once per test process.
pub fn extension_binary() -> PathBuf {
    static BINARY: OnceLock<Result<PathBuf, String>> = OnceLock::new();
    let binary = BINARY.get_or_init(|| match configured_binary() {
        Some(path) => Ok(path),
        None => build_extension_binary(),
    });
    match binary {
        Ok(path) => path.clone(),
        Err(e) => panic!("No extension binary: {e}"),
    }
}

fn configured_binary() -> Option<PathBuf> {
    std::env::var_os(crate::config::EXTENSION_PATH_VAR)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

fn build_extension_binary() -> Result<PathBuf, String> {
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .ok_or("harness crate has no parent directory")?;
    let target_dir = workspace.join("target").join("loadable-extension");
    let cargo = std::env::var_os("CARGO").unwrap_or_else(|| "cargo".into());

    let status = Command::new(cargo)
        .current_dir(workspace)
        .args(["build", "-p", "duckdb_rdkit", "--no-default-features"])
        .args(["--features", "loadable-extension", "--target-dir"])
        .arg(&target_dir)
        .status()
        .map_err(|e| format!("failed to run cargo: {e}"))?;
    if !status.success() {
        return Err(format!("cargo build of the loadable extension failed: {status}"));
    }

    let library = target_dir.join("debug").join(format!(
        "{}duckdb_rdkit{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    ));
    let platform = Engine::open_in_memory(&EngineConfig::default())
        .and_then(|engine| engine.platform())
        .map_err(|e| e.to_string())?;

    package(
        &library,
        &target_dir.join("package"),
        &ExtensionMetadata::for_platform(platform),
    )
    .map_err(|e| e.to_string())
}
