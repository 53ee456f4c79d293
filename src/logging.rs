use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "shorts.log";

pub fn log_path(config_dir: &Path) -> PathBuf {
    config_dir.join(LOG_FILE)
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "shorts=debug"
    } else {
        "shorts=info"
    }
}

/// Routes tracing output to `<config_dir>/shorts.log`. The terminal belongs
/// to the UI, so nothing is written to stdout or stderr.
///
/// The returned guard flushes the writer when dropped and must outlive the
/// main loop. `RUST_LOG` takes precedence over `verbose`.
pub fn init(config_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create log directory {}", config_dir.display()))?;

    let appender = tracing_appender::rolling::never(config_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "shorts starting");
    Ok(guard)
}
