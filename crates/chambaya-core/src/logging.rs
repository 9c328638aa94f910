//! Tracing setup.
//!
//! Filter comes from `CHAMBAYA_LOG`, falling back to `[log].level`.
//! Output goes to daily-rotated files under `$CHAMBAYA_HOME/logs`, or to
//! stderr when file logging is disabled. Session tokens must never be
//! passed to a tracing macro.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, paths};

/// Env var holding an EnvFilter directive.
pub const LOG_ENV: &str = "CHAMBAYA_LOG";

const LOG_FILE_PREFIX: &str = "chambaya.log";

/// Keeps the background log writer alive; drop it last.
#[must_use]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber writing under the default logs dir.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<LogGuard> {
    init_in(config, &paths::logs_dir())
}

/// Installs the global subscriber writing rotated files into `logs_dir`.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init_in(config: &LogConfig, logs_dir: &Path) -> Result<LogGuard> {
    let filter = build_filter(config);

    if !config.file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;
        return Ok(LogGuard { _worker: None });
    }

    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))?;

    Ok(LogGuard {
        _worker: Some(guard),
    })
}
