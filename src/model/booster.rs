//! Gradient-boosted regression trees under squared loss.
//!
//! Training is delegated to the `gbdt` crate. This module adapts it to
//! linfa's `Fit` and `PredictInplace` traits, so the regressor slots in
//! wherever a linfa model would, and converts between ndarray rows and the
//! crate's `DataVec` records.

use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use linfa::prelude::*;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Loss name understood by `gbdt::config::Config::set_loss`
const SQUARED_LOSS: &str = "SquaredError";

/// Boosting hyperparameters.
///
/// The defaults are the ones `gbdt::config::Config::new()` ships with; nothing
/// is tuned for the price data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastTreeParams {
    /// Number of boosting rounds (trees)
    pub n_trees: usize,
    /// Depth of each tree; a tree has at most `2^max_depth` leaves
    pub max_depth: u32,
    /// A node with this many training rows or fewer becomes a leaf
    pub min_samples_leaf: usize,
    /// Shrinkage applied to every tree's output
    pub learning_rate: f32,
}

impl Default for FastTreeParams {
    fn default() -> Self {
        Self {
            n_trees: 2,
            max_depth: 2,
            min_samples_leaf: 1,
            learning_rate: 1.0,
        }
    }
}

impl FastTreeParams {
    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`] naming the first invalid parameter
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(ForecastError::Config("n_trees must be at least 1".to_owned()));
        }
        if self.max_depth == 0 {
            return Err(ForecastError::Config(
                "max_depth must be at least 1".to_owned(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForecastError::Config(
                "min_samples_leaf must be at least 1".to_owned(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ForecastError::Config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    fn gbdt_config(&self, n_features: usize) -> GbdtConfig {
        let mut cfg = GbdtConfig::new();
        cfg.set_feature_size(n_features);
        cfg.set_max_depth(self.max_depth);
        cfg.set_iterations(self.n_trees);
        cfg.set_shrinkage(self.learning_rate);
        cfg.set_min_leaf_size(self.min_samples_leaf);
        cfg.set_loss(SQUARED_LOSS);
        cfg.set_data_sample_ratio(1.0);
        cfg.set_feature_sample_ratio(1.0);
        cfg.set_debug(false);
        cfg
    }
}

/// A fitted boosted ensemble
pub struct FastTreeRegressor {
    gbdt: GBDT,
    n_features: usize,
    n_trees: usize,
}

impl std::fmt::Debug for FastTreeRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastTreeRegressor")
            .field("n_features", &self.n_features)
            .field("n_trees", &self.n_trees)
            .finish_non_exhaustive()
    }
}

impl FastTreeRegressor {
    /// Number of input features the model was trained on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }
}

fn feature_vec(row: ArrayView1<'_, f64>) -> Vec<ValueType> {
    row.iter().map(|&v| v as ValueType).collect()
}

impl Fit<Array2<f64>, Array1<f64>, ForecastError> for FastTreeParams {
    type Object = FastTreeRegressor;

    fn fit(&self, dataset: &DatasetBase<Array2<f64>, Array1<f64>>) -> Result<Self::Object> {
        self.validate()?;

        let x = &dataset.records;
        let y = &dataset.targets;

        if x.nrows() == 0 {
            return Err(ForecastError::Training(
                "training set has no rows".to_owned(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(ForecastError::Training(format!(
                "feature rows ({}) and labels ({}) differ in length",
                x.nrows(),
                y.len()
            )));
        }
        if let Some((row, _)) = x
            .rows()
            .into_iter()
            .zip(y.iter())
            .enumerate()
            .find(|(_, (features, label))| {
                !label.is_finite() || features.iter().any(|v| !v.is_finite())
            })
        {
            return Err(ForecastError::Training(format!(
                "row {row} has a non-finite feature or label value"
            )));
        }

        let mut train: DataVec = x
            .rows()
            .into_iter()
            .zip(y.iter())
            .map(|(row, &label)| {
                Data::new_training_data(feature_vec(row), 1.0, label as ValueType, None)
            })
            .collect();

        let mut gbdt = GBDT::new(&self.gbdt_config(x.ncols()));
        gbdt.fit(&mut train);

        tracing::info!(
            "Fitted {} trees (depth {}) on {} rows x {} features",
            self.n_trees,
            self.max_depth,
            x.nrows(),
            x.ncols()
        );

        Ok(FastTreeRegressor {
            gbdt,
            n_features: x.ncols(),
            n_trees: self.n_trees,
        })
    }
}

impl PredictInplace<Array2<f64>, Array1<f64>> for FastTreeRegressor {
    fn predict_inplace(&self, x: &Array2<f64>, y: &mut Array1<f64>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        if x.nrows() == 0 {
            return;
        }

        let rows: DataVec = x
            .rows()
            .into_iter()
            .map(|row| Data::new_test_data(feature_vec(row), None))
            .collect();

        for (target, p) in y.iter_mut().zip(self.gbdt.predict(&rows)) {
            *target = f64::from(p);
        }
    }

    fn default_target(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::zeros(x.nrows())
    }
}
