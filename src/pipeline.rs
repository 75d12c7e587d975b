//! Learning pipeline: column transforms followed by a trainer.
//!
//! A [`PipelineSpec`] is a versioned, serialisable list of steps. Fitting it on
//! a table validates the steps against the table's schema, applies the column
//! transforms and trains the final step. The resulting [`FittedPipeline`]
//! scores new tables by replaying the same transforms.
//!
//! # Example
//!
//! ```no_run
//! use polars::prelude::*;
//! use stock_forecast::model::FastTreeParams;
//! use stock_forecast::pipeline::{PipelineSpec, SCORE};
//!
//! # fn run(train: DataFrame, test: DataFrame) -> stock_forecast::error::Result<()> {
//! let spec = PipelineSpec::stock_forecast(FastTreeParams::default());
//! let fitted = spec.fit(&train)?;
//! let scored = fitted.transform(&test)?;
//! println!("{:?}", scored.column(SCORE)?);
//! # Ok(())
//! # }
//! ```

pub mod executor;
pub mod spec;
pub mod validation;

pub use executor::FittedPipeline;
pub use spec::{FEATURES, LABEL, PipelineSpec, SCORE, SPEC_VERSION, Step};
pub use validation::{ValidationError, validate_pipeline};
