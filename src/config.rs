use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ForecastError, Result, ResultExt as _};
use crate::model::FastTreeParams;

/// Optional override file, looked up in the working directory
pub const CONFIG_FILE: &str = "forecast.json";

pub const DEFAULT_DATA_FILE: &str = "stock_data.csv";
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
/// Rows shown before training, same as a default data-view preview
pub const DEFAULT_PREVIEW_ROWS: usize = 100;

/// Where and how to read the price file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    pub separator: char,
    pub has_header: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_FILE),
            separator: ',',
            has_header: false,
        }
    }
}

impl DataConfig {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Separator as the single byte the CSV reader expects
    pub fn separator_byte(&self) -> Result<u8> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(ForecastError::Config(format!(
                "separator must be an ASCII character, got '{}'",
                self.separator
            )))
        }
    }
}

/// Everything the forecast run needs, passed explicitly to each stage
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ForecastConfig {
    pub data: DataConfig,
    /// Share of rows held out for evaluation
    pub test_fraction: f64,
    /// Split seed; `None` draws a fresh one per run
    pub seed: Option<u64>,
    pub preview_rows: usize,
    pub trainer: FastTreeParams,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            trainer: FastTreeParams::default(),
        }
    }
}

impl ForecastConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Reject values no stage could run with
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Config`] describing the first bad value
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ForecastError::Config(format!(
                "test_fraction must be between 0 and 1, got {}",
                self.test_fraction
            )));
        }
        self.data.separator_byte()?;
        self.trainer.validate()
    }
}

/// Load `forecast.json` from the working directory, or the defaults when absent
pub fn load_config() -> Result<ForecastConfig> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        tracing::info!("Loading configuration from {}", path.display());
        ForecastConfig::from_file(path)
    } else {
        Ok(ForecastConfig::default())
    }
}
