//! Regression metrics over a scored table.

use linfa::prelude::*;
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Regression evaluator output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Coefficient of determination, 1 − SSres/SStot
    pub r_squared: f64,
    pub root_mean_squared_error: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    /// Average training loss; squared loss, so equal to the MSE
    pub loss_function: f64,
}

/// One scored row: the model's Close estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub predicted_close: f32,
}

/// Compare `score_column` against `label_column` row by row.
///
/// # Errors
///
/// Returns [`ForecastError::Evaluation`] when the table is empty or either
/// column has a missing value.
pub fn evaluate(
    scored: &DataFrame,
    label_column: &str,
    score_column: &str,
) -> Result<RegressionMetrics> {
    if scored.height() == 0 {
        return Err(ForecastError::Evaluation(
            "the test subset is empty".to_owned(),
        ));
    }

    let labels = complete_column(scored, label_column)?;
    let scores = complete_column(scored, score_column)?;

    let metric = |e: linfa::Error| ForecastError::Evaluation(e.to_string());
    let r_squared = scores.r2(&labels).map_err(metric)?;
    let mean_squared_error = scores.mean_squared_error(&labels).map_err(metric)?;
    let mean_absolute_error = scores.mean_absolute_error(&labels).map_err(metric)?;

    let metrics = RegressionMetrics {
        r_squared,
        root_mean_squared_error: mean_squared_error.sqrt(),
        mean_absolute_error,
        mean_squared_error,
        loss_function: mean_squared_error,
    };
    tracing::info!(
        "Evaluated {} rows: R2 {:.4}, RMSE {:.4}",
        scored.height(),
        metrics.r_squared,
        metrics.root_mean_squared_error
    );
    Ok(metrics)
}

/// Typed view of the `score_column` of a scored table
pub fn prediction_records(scored: &DataFrame, score_column: &str) -> Result<Vec<PredictionRecord>> {
    Ok(complete_column(scored, score_column)?
        .iter()
        .map(|&p| PredictionRecord {
            predicted_close: p as f32,
        })
        .collect())
}

fn complete_column(df: &DataFrame, name: &str) -> Result<Array1<f64>> {
    let series = df
        .column(name)
        .map_err(|_| ForecastError::Evaluation(format!("column '{name}' not found")))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    if series.null_count() > 0 {
        return Err(ForecastError::Evaluation(format!(
            "column '{name}' has {} missing values",
            series.null_count()
        )));
    }
    Ok(series.f64()?.into_no_null_iter().collect())
}
