//! Structured logging infrastructure, based on the tracing crate.
//!
//! Supports pretty, compact, and JSON formats with optional file output.
//! Initialization is idempotent: a second call against an already-set global
//! subscriber is a no-op, not an error.

use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

// Keeps the non-blocking file writer alive for the process lifetime.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Error type for logging operations.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// IO error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error in subscriber setup
    #[error("Subscriber setup failed: {0}")]
    Subscriber(String),
}

/// Result type for logging operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Initialize the logging system with the given configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let result = match &config.file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "entag.log".to_string());
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            init_with_writer(config.format, filter, writer)
        }
        None => init_with_writer(config.format, filter, std::io::stdout),
    };

    // A subscriber set earlier in the process wins silently.
    match result {
        Err(LogError::Subscriber(message)) if message.contains("has already been set") => Ok(()),
        other => other,
    }
}

fn init_with_writer<W>(format: LogFormat, filter: EnvFilter, writer: W) -> Result<()>
where
    W: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_level(true);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    result.map_err(|e| LogError::Subscriber(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;

    #[test]
    fn init_is_idempotent() {
        let config = LoggingConfig::default();
        init(&config).unwrap();
        // Second initialization must not fail.
        init(&config).unwrap();
    }
}
