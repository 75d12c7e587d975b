//! Error kinds for the forecasting pipeline.
//!
//! Every stage returns [`Result<T>`], so a failure anywhere propagates with `?`
//! up to `main` and ends the run:
//!
//! ```
//! use stock_forecast::error::ForecastError;
//!
//! fn describe(err: &ForecastError) -> &'static str {
//!     match err {
//!         ForecastError::FileNotFound(_) => "input missing",
//!         ForecastError::Parse(_) => "malformed row",
//!         ForecastError::Training(_) => "trainer rejected the data",
//!         ForecastError::Evaluation(_) => "nothing to score",
//!         _ => "other failure",
//!     }
//! }
//! ```
//!
//! [`ResultExt`] attaches a message to any convertible error:
//!
//! ```no_run
//! use stock_forecast::error::ResultExt as _;
//!
//! fn read_prices() -> stock_forecast::error::Result<String> {
//!     std::fs::read_to_string("stock_data.csv").context("Failed to read prices")
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for forecasting operations.
#[derive(Debug)]
pub enum ForecastError {
    /// The input file does not exist
    FileNotFound(PathBuf),

    /// A row could not be parsed into a stock record
    Parse(String),

    /// The trainer's numeric preconditions do not hold
    Training(String),

    /// Metrics cannot be computed
    Evaluation(String),

    /// The table cannot be partitioned
    Split(String),

    /// The pipeline spec is invalid for the input
    Pipeline(String),

    /// Configuration errors
    Config(String),

    /// Data processing errors raised by polars
    Data(String),

    /// I/O errors (file operations, stdout, etc.)
    Io(std::io::Error),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for ForecastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
            Self::Training(msg) => write!(f, "Training error: {msg}"),
            Self::Evaluation(msg) => write!(f, "Evaluation error: {msg}"),
            Self::Split(msg) => write!(f, "Split error: {msg}"),
            Self::Pipeline(msg) => write!(f, "Pipeline error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Data(msg) => write!(f, "Data processing error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ForecastError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for ForecastError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::Data(err.to_string())
    }
}

// Required by linfa's `Fit` trait for custom trainers.
impl From<linfa::Error> for ForecastError {
    fn from(err: linfa::Error) -> Self {
        Self::Training(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ForecastError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: ForecastError = e.into();
            ForecastError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ForecastError = e.into();
            ForecastError::Other(format!("{}: {}", f(), err))
        })
    }
}
