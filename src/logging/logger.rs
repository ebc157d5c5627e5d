// file: src/logging/logger.rs
// version: 1.0.0
// guid: 3694db75-86aa-4e9f-86d6-37ad76c3ef36

//! Logger initialization and configuration

use crate::config::{LogFormat, LoggingConfig};
use crate::error::InvokeError;
use crate::Result;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the CLI flags, falling back to the configured level
pub fn filter_directive(debug: bool, quiet: bool, configured: &str) -> String {
    if quiet {
        "error".to_string()
    } else if debug {
        "debug".to_string()
    } else {
        configured.to_string()
    }
}

/// Initialize the logging system. Output goes to stderr so stdout stays
/// reserved for toolchain output and JSON results.
pub fn init_logger(debug: bool, quiet: bool, config: &LoggingConfig) -> Result<()> {
    let directive = filter_directive(debug, quiet, &config.level);
    let filter = EnvFilter::try_new(&directive)
        .map_err(|e| InvokeError::logging(format!("Invalid log level '{}': {}", directive, e)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let initialized = match config.format {
        LogFormat::Compact => registry.with(base.compact()).try_init(),
        LogFormat::Pretty => registry.with(base.pretty()).try_init(),
        LogFormat::Json => registry.with(base.json()).try_init(),
    };

    initialized.map_err(|e| InvokeError::logging(format!("Failed to initialize logger: {}", e)))
}

/// Create an async scoped logger for operations
pub async fn with_async_operation_span<F, Fut, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let span = tracing::info_span!("operation", name = operation);
    async move { f().await }.instrument(span).await
}
