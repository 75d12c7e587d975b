//! # Stock Forecast Entry Point
//!
//! Runs the forecast once over the configured price file and prints the
//! report to stdout. Diagnostics go to stderr; set `RUST_LOG=debug` for more.
//!
//! ```bash
//! stock-forecast            # reads ./stock_data.csv
//! RUST_LOG=warn stock-forecast
//! ```
//!
//! An optional `forecast.json` in the working directory overrides the
//! defaults (path, split fraction and seed, trainer parameters).

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context as _, Result};

use stock_forecast::{config, flow, logging};

fn main() -> Result<()> {
    logging::init()?;

    let config = config::load_config().context("Failed to load configuration")?;
    tracing::debug!("Configuration: {config:?}");

    let outcome = flow::run_forecast(&config, std::io::stdout().lock())
        .with_context(|| format!("Forecast over {} failed", config.data.path.display()))?;

    tracing::info!(
        "Trained on {} rows, tested on {} (seed {})",
        outcome.train_rows,
        outcome.test_rows,
        outcome.seed
    );
    Ok(())
}
