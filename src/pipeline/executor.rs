//! Pipeline execution engine.
//!
//! Fitting applies the column steps to the training table, hands the stacked
//! features and label to the trainer and keeps the fitted model. The fitted
//! pipeline replays the same column steps on new data and appends a `Score`
//! column with the model's predictions.

use linfa::prelude::*;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

use super::spec::{PipelineSpec, SCORE, Step};
use super::validation::validate_pipeline;
use crate::error::{ForecastError, Result};
use crate::model::FastTreeRegressor;

/// A pipeline whose trainer has been fitted
#[derive(Debug, Clone)]
pub struct FittedPipeline<M = FastTreeRegressor> {
    spec: PipelineSpec,
    feature_column: String,
    model: M,
}

/// Table after the column steps, with vector columns held as matrices
struct Transformed {
    frame: DataFrame,
    vectors: HashMap<String, Array2<f64>>,
}

impl PipelineSpec {
    /// Fit the spec's own trainer step on `train`.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::Pipeline`] if the spec does not validate against `train`
    /// - [`ForecastError::Training`] if the trainer rejects the data
    pub fn fit(&self, train: &DataFrame) -> Result<FittedPipeline> {
        match self.trainer() {
            Some(Step::FastTree { params, .. }) => self.fit_with(train, params),
            _ => Err(ForecastError::Pipeline(
                "pipeline has no trainer step".to_owned(),
            )),
        }
    }

    /// Fit with any linfa-compatible trainer in place of the spec's trainer
    /// parameters. Column names still come from the spec.
    pub fn fit_with<P>(&self, train: &DataFrame, trainer: &P) -> Result<FittedPipeline<P::Object>>
    where
        P: Fit<Array2<f64>, Array1<f64>, ForecastError>,
    {
        let start = Instant::now();
        self.ensure_valid(train)?;

        let Some(Step::FastTree {
            label_column,
            feature_column,
            ..
        }) = self.trainer()
        else {
            return Err(ForecastError::Pipeline(
                "pipeline has no trainer step".to_owned(),
            ));
        };

        let mut transformed = apply_transforms(self, train)?;
        let features = transformed.vectors.remove(feature_column).ok_or_else(|| {
            ForecastError::Pipeline(format!("feature column '{feature_column}' was not built"))
        })?;
        let labels = numeric_column(&transformed.frame, label_column)?;

        tracing::info!(
            "Fitting '{}' on {} rows ({} features)",
            self.name,
            features.nrows(),
            features.ncols()
        );
        let model = trainer.fit(&Dataset::new(features, labels))?;
        tracing::info!("Pipeline fitted in {:.2}s", start.elapsed().as_secs_f64());

        Ok(FittedPipeline {
            spec: self.clone(),
            feature_column: feature_column.clone(),
            model,
        })
    }

    fn ensure_valid(&self, df: &DataFrame) -> Result<()> {
        let schema = df.schema().clone();
        let errors = validate_pipeline(self, &schema);
        if errors.is_empty() {
            return Ok(());
        }
        Err(ForecastError::Pipeline(format!(
            "Pipeline validation failed:\n{}",
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        )))
    }
}

impl<M> FittedPipeline<M>
where
    M: PredictInplace<Array2<f64>, Array1<f64>>,
{
    /// Apply the column steps and the model to `df`.
    ///
    /// Returns `df` with the copied columns and a Float32 `Score` column,
    /// row order unchanged.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut transformed = apply_transforms(&self.spec, df)?;
        let features = transformed
            .vectors
            .remove(&self.feature_column)
            .ok_or_else(|| {
                ForecastError::Pipeline(format!(
                    "feature column '{}' was not built",
                    self.feature_column
                ))
            })?;

        let mut scores = self.model.default_target(&features);
        self.model.predict_inplace(&features, &mut scores);

        let score: Vec<f32> = scores.iter().map(|&s| s as f32).collect();
        transformed
            .frame
            .with_column(Series::new(SCORE.into(), score))?;

        tracing::debug!("Scored {} rows", transformed.frame.height());
        Ok(transformed.frame)
    }
}

/// Run every column step, in order, on a copy of `df`
fn apply_transforms(spec: &PipelineSpec, df: &DataFrame) -> Result<Transformed> {
    let mut out = Transformed {
        frame: df.clone(),
        vectors: HashMap::new(),
    };

    for step in &spec.steps {
        match step {
            Step::Concatenate { output, inputs } => {
                let matrix = stack_columns(&out.frame, inputs)?;
                out.vectors.insert(output.clone(), matrix);
            }
            Step::CopyColumns { output, input } => {
                let copy = out
                    .frame
                    .column(input)?
                    .as_materialized_series()
                    .clone()
                    .with_name(output.as_str().into());
                out.frame.with_column(copy)?;
            }
            Step::FastTree { .. } => {}
        }
    }

    Ok(out)
}

/// Stack columns side by side, in the given order, as an `n x k` matrix
fn stack_columns(df: &DataFrame, inputs: &[String]) -> Result<Array2<f64>> {
    let mut matrix = Array2::<f64>::zeros((df.height(), inputs.len()));
    for (mut target, name) in matrix.columns_mut().into_iter().zip(inputs) {
        target.assign(&numeric_column(df, name)?);
    }
    Ok(matrix)
}

/// A numeric column as f64; nulls become NaN so the trainer can reject them
fn numeric_column(df: &DataFrame, name: &str) -> Result<Array1<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}
