//! Headless typeahead host: raw queries on stdin, JSON snapshots on stdout.
//!
//! Usage: `typeahead-host [CONFIG_PATH]`. Without a path the platform config
//! directory is used; a missing file means defaults.
//!
//! All tracing output goes to stderr so that stdout remains a clean JSON
//! channel.

use std::path::PathBuf;
use std::time::Duration;

use typeahead::host::stdio::run_stdio_bridge;
use typeahead::{HostConfig, build_controller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(HostConfig::default_config_path);
    let config = HostConfig::load_or_default(&config_path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", config_path.display()))?;

    tracing::info!(
        index = %config.index.base_url,
        summary = %config.summary.base_url,
        debounce_ms = config.typeahead.debounce_ms,
        "typeahead-host starting"
    );

    let controller = build_controller(&config)?;
    let settle_timeout = Duration::from_millis(config.typeahead.settle_timeout_ms);

    run_stdio_bridge(controller, settle_timeout)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "typeahead-host exited with error");
            anyhow::anyhow!("typeahead-host failed: {e}")
        })?;

    tracing::info!("typeahead-host shut down cleanly");
    Ok(())
}
