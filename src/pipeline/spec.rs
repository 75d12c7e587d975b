//! Pipeline specification data structures.
//!
//! A spec is an ordered list of [`Step`]s: column transforms followed by one
//! trainer. It is plain data until it is fitted, so building one never fails.

use serde::{Deserialize, Serialize};

use crate::data::{CLOSE, HIGH, LOW, OPEN};
use crate::error::Result;
use crate::model::FastTreeParams;

/// Current pipeline spec version
pub const SPEC_VERSION: &str = "0.1";

/// Name of the stacked feature vector
pub const FEATURES: &str = "Features";
/// Name of the regression target
pub const LABEL: &str = "Label";
/// Name of the prediction column added by a fitted pipeline
pub const SCORE: &str = "Score";

/// Root pipeline specification structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Specification version for future migrations
    pub version: String,

    /// Human-readable pipeline name
    pub name: String,

    /// Ordered sequence of steps; the last one trains the model
    pub steps: Vec<Step>,
}

impl PipelineSpec {
    /// Create an empty pipeline spec
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SPEC_VERSION.to_owned(),
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Open, High and Low stacked into `Features`, Close copied to `Label`,
    /// then a boosted-tree regressor.
    pub fn stock_forecast(trainer: FastTreeParams) -> Self {
        Self::new("stock_close_forecast")
            .append(Step::Concatenate {
                output: FEATURES.to_owned(),
                inputs: vec![OPEN.to_owned(), HIGH.to_owned(), LOW.to_owned()],
            })
            .append(Step::CopyColumns {
                output: LABEL.to_owned(),
                input: CLOSE.to_owned(),
            })
            .append(Step::FastTree {
                label_column: LABEL.to_owned(),
                feature_column: FEATURES.to_owned(),
                params: trainer,
            })
    }

    #[must_use]
    pub fn append(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Parse a pipeline spec from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize pipeline spec to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The trainer step, if the spec has one
    pub fn trainer(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.is_trainer())
    }
}

/// Pipeline step (tagged enum)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Stack numeric columns, in order, into one feature vector
    Concatenate { output: String, inputs: Vec<String> },

    /// Copy a column under a new name
    CopyColumns { output: String, input: String },

    /// Fit boosted regression trees on a feature vector and label
    FastTree {
        #[serde(default = "default_label")]
        label_column: String,
        #[serde(default = "default_features")]
        feature_column: String,
        #[serde(default)]
        params: FastTreeParams,
    },
}

impl Step {
    pub fn is_trainer(&self) -> bool {
        matches!(self, Self::FastTree { .. })
    }

    /// Short name used in logs and validation messages
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::Concatenate { .. } => "concatenate",
            Self::CopyColumns { .. } => "copy_columns",
            Self::FastTree { .. } => "fast_tree",
        }
    }
}

fn default_label() -> String {
    LABEL.to_owned()
}

fn default_features() -> String {
    FEATURES.to_owned()
}
