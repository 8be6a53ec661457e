//! Tracing setup
//!
//! `FORTRESS_LOG_FORMAT=json` for JSON lines, pretty output otherwise.
//! `FORTRESS_LOG_DIR` adds a daily-rolling JSON log file.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "fortress-ops.log";

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the life of the process.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    let log_format = std::env::var("FORTRESS_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("fortress=info"))?;

    let (file_layer, guard) = match std::env::var("FORTRESS_LOG_DIR") {
        Ok(dir) => {
            let dir = shellexpand::tilde(&dir).into_owned();
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    match log_format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init()?,
        _ => registry.with(fmt::layer().pretty()).try_init()?,
    }

    Ok(guard)
}
