//! # Stock Forecast - Close Price Regression
//!
//! Reads a headerless daily price file (`Date,Open,High,Low,Close`), trains a
//! gradient-boosted tree regressor that predicts Close from Open, High and
//! Low, evaluates it on a held-out share of the rows and prints a plain-text
//! report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use stock_forecast::config::ForecastConfig;
//! use stock_forecast::flow::run_forecast;
//!
//! let outcome = run_forecast(&ForecastConfig::default(), std::io::stdout().lock())?;
//! eprintln!("R2 on {} test rows: {}", outcome.test_rows, outcome.metrics.r_squared);
//! # Ok::<(), stock_forecast::error::ForecastError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`data`]: positional CSV loading into a polars `DataFrame`
//! - [`pipeline`]: versioned step list (concatenate, copy, train) and its execution
//! - [`model`]: boosted regression trees behind linfa's `Fit`/`PredictInplace`
//! - [`split`]: seeded train/test partition
//! - [`evaluate`]: R², RMSE and friends over a scored table
//! - [`report`]: the stdout report lines
//! - [`flow`]: the whole run, start to finish
//! - [`config`], [`error`], [`logging`]: configuration, error kinds, tracing setup
//!
//! ## Data Flow
//!
//! ```text
//! file -> StockLoader -> DataFrame -> train_test_split
//!            train -> PipelineSpec::fit -> FittedPipeline
//!            test  -> FittedPipeline::transform -> evaluate -> Reporter
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod flow;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod split;
