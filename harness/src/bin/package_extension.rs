//! `package-extension <library> <out-dir>`
//!
//! Appends DuckDB's extension footer to a library built with
//! `--features loadable-extension`, targeting the platform of the DuckDB
//! linked into this binary.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use rdkit_harness::package::{ExtensionMetadata, package};
use rdkit_harness::{Engine, EngineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rdkit_harness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let (Some(library), Some(out_dir), None) = (args.next(), args.next(), args.next()) else {
        tracing::error!("usage: package-extension <library> <out-dir>");
        return ExitCode::FAILURE;
    };

    let platform = match Engine::open_in_memory(&EngineConfig::default())
        .and_then(|engine| engine.platform())
    {
        Ok(platform) => platform,
        Err(e) => {
            tracing::error!("Failed to read the DuckDB platform: {e}");
            return ExitCode::FAILURE;
        }
    };

    match package(&library, &out_dir, &ExtensionMetadata::for_platform(platform)) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Failed to package extension: {e}");
            ExitCode::FAILURE
        }
    }
}
