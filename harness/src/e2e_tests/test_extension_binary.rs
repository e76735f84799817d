//! Loads the packaged extension binary through `LOAD`.
//!
//! The binary is built and packaged on first use unless
//! `DUCKDB_RDKIT_EXTENSION_BINARY_PATH` names one already.

use crate::config::HarnessConfig;
use crate::engine::{Engine, EngineConfig, EngineError};
use crate::package::{APPENDED_SIZE, EXTENSION_FILE_NAME};
use crate::scenario::VALUE_COLUMN;
use crate::suite::{HarnessError, Suite};
use crate::testing::extension_binary;

#[test]
fn test_binary_is_named_for_its_entry_point() {
    let path = extension_binary();
    assert!(path.is_file(), "{}", path.display());
    assert_eq!(path.file_name().unwrap(), EXTENSION_FILE_NAME);
}

#[test]
fn test_binary_passes_default_suite() {
    let report = Suite::default()
        .run(&HarnessConfig::new(extension_binary()))
        .unwrap();
    assert_eq!(report.passed(), 2);
    assert!(report.is_success(), "{report:?}");
}

#[test]
fn test_binary_loads_once_and_serves_every_session() {
    let path = extension_binary();
    let mut engine = Engine::open_in_memory(&EngineConfig::allowing_unsigned_extensions()).unwrap();
    engine.load_extension(&path).unwrap();
    assert_eq!(engine.loaded_extensions(), [path]);

    for _ in 0..2 {
        let session = engine.session().unwrap();
        let result = session.query("SELECT duckdb_rdkit('Sam') AS value;").unwrap();
        assert_eq!(result.single_text(VALUE_COLUMN), Ok("DuckdbRdkit Sam 🐥"));
        session.close().unwrap();
    }
    engine.close().unwrap();
}

#[test]
fn test_binary_rejected_when_unsigned_not_allowed() {
    let mut config = HarnessConfig::new(extension_binary());
    config.allow_unsigned_extensions = false;

    let result = Suite::default().run(&config);
    assert!(matches!(
        result,
        Err(HarnessError::Setup(EngineError::ExtensionLoad { .. }))
    ));
}

#[test]
fn test_unpackaged_library_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let packaged = std::fs::read(extension_binary()).unwrap();
    let bare = dir.path().join(EXTENSION_FILE_NAME);
    std::fs::write(&bare, &packaged[..packaged.len() - APPENDED_SIZE]).unwrap();

    let result = Suite::default().run(&HarnessConfig::new(bare));
    assert!(matches!(
        result,
        Err(HarnessError::Setup(EngineError::ExtensionLoad { .. }))
    ));
}
