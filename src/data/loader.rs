//! Reads the price file into a polars table under the fixed stock schema.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::schema::{PRICE_COLUMNS, StockRecord, records, stock_schema};
use crate::config::DataConfig;
use crate::error::{ForecastError, Result};

/// Loader bound to one price file
#[derive(Debug, Clone)]
pub struct StockLoader {
    path: PathBuf,
    separator: u8,
    has_header: bool,
}

impl StockLoader {
    pub fn new(config: &DataConfig) -> Result<Self> {
        Ok(Self {
            path: config.path.clone(),
            separator: config.separator_byte()?,
            has_header: config.has_header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn scan(&self) -> Result<LazyFrame> {
        if !self.path.is_file() {
            return Err(ForecastError::FileNotFound(self.path.clone()));
        }

        LazyCsvReader::new(&self.path)
            .with_has_header(self.has_header)
            .with_separator(self.separator)
            .with_schema(Some(Arc::new(stock_schema())))
            .finish()
            .map_err(|e| ForecastError::Parse(e.to_string()))
    }

    /// Load and validate the whole file.
    ///
    /// # Errors
    ///
    /// - [`ForecastError::FileNotFound`] if the file does not exist
    /// - [`ForecastError::Parse`] if a price cell is missing or not a number
    pub fn load(&self) -> Result<DataFrame> {
        let df = self
            .scan()?
            .collect()
            .map_err(|e| ForecastError::Parse(e.to_string()))?;

        ensure_complete(&df)?;
        tracing::info!(
            "Loaded {} rows from {}",
            df.height(),
            self.path.display()
        );
        Ok(df)
    }

    /// First `n` rows, read without materialising the rest of the file
    pub fn preview(&self, n: usize) -> Result<Vec<StockRecord>> {
        let limit = IdxSize::try_from(n).unwrap_or(IdxSize::MAX);
        let head = self
            .scan()?
            .limit(limit)
            .collect()
            .map_err(|e| ForecastError::Parse(e.to_string()))?;
        ensure_complete(&head)?;
        records(&head)
    }
}

/// Short rows leave trailing price cells empty; empty cells read as null.
fn ensure_complete(df: &DataFrame) -> Result<()> {
    for name in PRICE_COLUMNS {
        let column = df.column(name)?;
        if column.null_count() == 0 {
            continue;
        }
        let row = column
            .as_materialized_series()
            .is_null()
            .into_iter()
            .position(|v| v == Some(true))
            .unwrap_or(0);
        return Err(ForecastError::Parse(format!(
            "row {}: column '{name}' is missing or not a valid number",
            row + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{CLOSE, OPEN};
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(format!("{name}.csv"));
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    fn loader_for(path: &Path) -> StockLoader {
        StockLoader::new(&DataConfig::with_path(path)).expect("valid config")
    }

    #[test]
    fn test_load_positional_columns() -> Result<()> {
        let dir = TempDir::new().expect("temp dir");
        let path = write_fixture(
            &dir,
            "valid",
            "2024-01-02,10.5,11,10,10.75\n2024-01-03,10.75,12,10.5,11.5\n",
        );

        let df = loader_for(&path).load()?;
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 5);
        assert_eq!(df.column(OPEN)?.dtype(), &DataType::Float32);

        let rows = records(&df)?;
        assert_eq!(rows[0].date, "2024-01-02");
        assert!((rows[0].open - 10.5).abs() < f32::EPSILON);
        assert!((rows[1].close - 11.5).abs() < f32::EPSILON);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let loader = loader_for(Path::new("no_such_dir/stock_data.csv"));
        assert!(matches!(
            loader.load(),
            Err(ForecastError::FileNotFound(_))
        ));
        assert!(matches!(
            loader.preview(5),
            Err(ForecastError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_number_is_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_fixture(
            &dir,
            "malformed",
            "2024-01-02,10,11,9,10.5\n2024-01-03,abc,12,10,11\n2024-01-04,11,12,10,11.5\n",
        );

        let result = loader_for(&path).load();
        assert!(
            matches!(result, Err(ForecastError::Parse(_))),
            "expected parse error, got {result:?}"
        );
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_fixture(&dir, "short", "2024-01-02,10,11,9,10.5\n2024-01-03,10,12\n");

        let err = loader_for(&path).load().unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)), "got {err}");
    }

    #[test]
    fn test_extra_column_is_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_fixture(
            &dir,
            "extra",
            "2024-01-02,1,2,0.5,1.5\n2024-01-03,1,2,0.5,1.5,9\n2024-01-04,1,2,0.5,1.5\n",
        );

        let err = loader_for(&path).load().unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)), "got {err}");
    }

    #[test]
    fn test_preview_reads_first_rows() -> Result<()> {
        let body: String = (0..50)
            .map(|i| format!("day-{i},{i}.0,{i}.5,{i}.0,{i}.25\n"))
            .collect();
        let dir = TempDir::new().expect("temp dir");
        let path = write_fixture(&dir, "preview", &body);

        let rows = loader_for(&path).preview(3)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].date, "day-2");
        assert!((rows[2].open - 2.0).abs() < f32::EPSILON);
        Ok(())
    }

    #[test]
    fn test_header_row_can_be_skipped() -> Result<()> {
        let dir = TempDir::new().expect("temp dir");
        let path = write_fixture(
            &dir,
            "header",
            "Date,Open,High,Low,Close\n2024-01-02,10,11,9,10.5\n",
        );

        let config = DataConfig {
            has_header: true,
            ..DataConfig::with_path(&path)
        };
        let df = StockLoader::new(&config)?.load()?;
        assert_eq!(df.height(), 1);
        let close = df.column(CLOSE)?.as_materialized_series().f32()?.get(0);
        assert_eq!(close, Some(10.5));
        Ok(())
    }
}
