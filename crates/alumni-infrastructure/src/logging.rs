//! Tracing subscriber set-up.

use alumni_core::config::LoggingSettings;
use anyhow::Context;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE_PREFIX: &str = "alumni.log";

/// Builds the level filter: `RUST_LOG` if set, otherwise `settings.level`.
pub fn env_filter(settings: &LoggingSettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("invalid log level '{}'", settings.level)),
    }
}

/// Installs the global subscriber: a stderr fmt layer plus, when enabled, a
/// daily rolling file under `logs_dir`.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub fn init_tracing(
    settings: &LoggingSettings,
    logs_dir: &Path,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = env_filter(settings)?;

    let (file_layer, guard) = if settings.file_logging {
        std::fs::create_dir_all(logs_dir)
            .with_context(|| format!("cannot create log directory {}", logs_dir.display()))?;
        let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("tracing subscriber already installed")?;

    tracing::info!(
        "[Logging] level '{}', file logging {}",
        settings.level,
        if settings.file_logging { "on" } else { "off" }
    );
    Ok(guard)
}
