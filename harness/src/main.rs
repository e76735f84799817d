#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code; a failed run must exit with a message.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use std::process::ExitCode;

use rdkit_harness::{HarnessConfig, HarnessError, Outcome, Suite};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rdkit_harness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match HarnessConfig::from_env().map_err(HarnessError::from) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Loaded configuration: extension_path={}, allow_unsigned_extensions={}, timeout={}s",
        config.extension_path.display(),
        config.allow_unsigned_extensions,
        config.timeout.as_secs()
    );

    // DuckDB calls block; keep them off the async workers.
    let timeout = config.timeout;
    let run = tokio::task::spawn_blocking(move || Suite::default().run(&config));

    let report = match tokio::time::timeout(timeout, run).await {
        Ok(Ok(Ok(report))) => report,
        Ok(Ok(Err(e))) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
        Ok(Err(e)) => {
            tracing::error!("Harness worker panicked: {e}");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            tracing::error!("Run did not finish within {}s", timeout.as_secs());
            // Dropping the runtime would wait for the stuck blocking worker.
            std::process::exit(1);
        }
    };

    for scenario in &report.scenarios {
        if let Outcome::Errored(e) = &scenario.outcome {
            tracing::debug!("{} errored: {e:?}", scenario.name);
        }
    }

    tracing::info!("{} passed, {} failed", report.passed(), report.failed());

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
