//! The end-to-end forecast run.

use polars::prelude::*;
use std::io::Write;
use std::time::{Duration, Instant};

use crate::config::ForecastConfig;
use crate::data::{CLOSE, StockLoader};
use crate::error::Result;
use crate::evaluate::{RegressionMetrics, evaluate, prediction_records};
use crate::pipeline::{LABEL, PipelineSpec, SCORE};
use crate::report::{Comparison, Reporter};
use crate::split::train_test_split;

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub rows_loaded: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub seed: u64,
    pub metrics: RegressionMetrics,
    pub comparisons: Vec<Comparison>,
    pub duration: Duration,
}

/// Load, split, fit, score and report.
///
/// The report is rendered into memory and written to `out` only once every
/// stage has succeeded, so a failed run leaves `out` untouched.
///
/// # Errors
///
/// Returns the first stage error; see [`crate::error::ForecastError`].
pub fn run_forecast<W: Write>(config: &ForecastConfig, mut out: W) -> Result<ForecastOutcome> {
    let start = Instant::now();
    config.validate()?;

    let loader = StockLoader::new(&config.data)?;
    tracing::info!("Reading prices from {}", loader.path().display());
    let mut report = Reporter::new(Vec::new());

    let preview = loader.preview(config.preview_rows)?;
    report.preview(&preview)?;

    let table = loader.load()?;
    let spec = PipelineSpec::stock_forecast(config.trainer.clone());

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!("Using split seed {seed}");
    let split = train_test_split(&table, config.test_fraction, seed)?;

    let fitted = spec.fit(&split.train_set)?;
    let scored = fitted.transform(&split.test_set)?;
    let metrics = evaluate(&scored, LABEL, SCORE)?;
    report.metrics(&metrics)?;

    let comparisons = comparisons(&scored)?;
    report.comparisons(&comparisons)?;

    out.write_all(&report.into_inner())?;
    out.flush()?;

    let outcome = ForecastOutcome {
        rows_loaded: table.height(),
        train_rows: split.train_set.height(),
        test_rows: split.test_set.height(),
        seed,
        metrics,
        comparisons,
        duration: start.elapsed(),
    };
    tracing::info!(
        "Forecast finished in {:.2}s ({} rows, {} held out)",
        outcome.duration.as_secs_f64(),
        outcome.rows_loaded,
        outcome.test_rows
    );
    Ok(outcome)
}

/// Actual Close against the Score of each scored row, in table order
fn comparisons(scored: &DataFrame) -> Result<Vec<Comparison>> {
    let actual = scored
        .column(CLOSE)?
        .as_materialized_series()
        .cast(&DataType::Float32)?;
    let predictions = prediction_records(scored, SCORE)?;

    Ok(actual
        .f32()?
        .into_iter()
        .zip(predictions)
        .map(|(actual, p)| Comparison {
            actual: actual.unwrap_or(f32::NAN),
            predicted: p.predicted_close,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use crate::error::ForecastError;

    #[test]
    fn test_missing_file_writes_nothing() {
        let config = ForecastConfig {
            data: DataConfig::with_path("definitely/not/here.csv"),
            seed: Some(1),
            ..ForecastConfig::default()
        };
        let mut out = Vec::new();

        let err = run_forecast(&config, &mut out).unwrap_err();
        assert!(matches!(err, ForecastError::FileNotFound(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_first() {
        let config = ForecastConfig {
            test_fraction: 1.5,
            ..ForecastConfig::default()
        };
        let err = run_forecast(&config, Vec::new()).unwrap_err();
        assert!(matches!(err, ForecastError::Config(_)));
    }

    #[test]
    fn test_comparisons_follow_row_order() -> Result<()> {
        let scored = df!(
            CLOSE => &[10.0f32, 20.0, 30.0],
            SCORE => &[11.0f32, 19.0, 31.0]
        )?;
        let rows = comparisons(&scored)?;
        assert_eq!(
            rows.iter().map(|c| (c.actual, c.predicted)).collect::<Vec<_>>(),
            vec![(10.0, 11.0), (20.0, 19.0), (30.0, 31.0)]
        );
        Ok(())
    }
}
