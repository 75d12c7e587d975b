//! Logging setup for the forecaster.
//!
//! Standard output carries the report, so diagnostics are written to stderr.
//! Verbosity defaults to `info` and can be overridden with `RUST_LOG`.
//!
//! ```no_run
//! stock_forecast::logging::init().expect("Failed to initialize logging");
//!
//! tracing::info!("Forecast started");
//! ```

use anyhow::{Context as _, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Default filter directive when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Builds the env filter, falling back to [`DEFAULT_FILTER`]
pub fn env_filter() -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")
}

/// Initializes the global subscriber with a stderr layer
///
/// # Errors
///
/// Returns error if the filter is invalid or a subscriber is already installed
pub fn init() -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized");

    Ok(())
}
