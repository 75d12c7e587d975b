//! Boosted regression-tree trainer used as the pipeline's final stage.
//!
//! [`FastTreeParams`] implements linfa `Fit` and yields a
//! [`FastTreeRegressor`], which implements linfa `PredictInplace`. The trees
//! themselves are grown by the `gbdt` crate.

pub mod booster;

pub use booster::{FastTreeParams, FastTreeRegressor};
