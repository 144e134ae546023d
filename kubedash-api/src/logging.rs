//! Logging configuration
//!
//! Console output plus an optional daily-rolling JSON file.

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingSettings;

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes
/// the file writer and must be held until shutdown.
pub fn init(settings: &LoggingSettings) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let console_layer = if settings.json {
        fmt::layer()
            .with_target(true)
            .json()
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_writer(std::io::stdout)
            .boxed()
    };

    let (file_layer, guard) = match &settings.log_dir {
        Some(dir) => {
            let (writer, guard) = non_blocking(rolling::daily(dir, "kubedash.log"));
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(level = %settings.level, json = settings.json, "Logging initialized");

    Ok(guard)
}
