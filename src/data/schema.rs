//! Column layout of the price file and the typed row view.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";

/// Price columns, in file order
pub const PRICE_COLUMNS: [&str; 4] = [OPEN, HIGH, LOW, CLOSE];

/// One row of the price file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub date: String,
    pub open: f32,
    pub high: f32,
    pub low: f32,
    pub close: f32,
}

/// Positional schema: 0=Date, 1=Open, 2=High, 3=Low, 4=Close
pub fn stock_schema() -> Schema {
    let mut schema = Schema::with_capacity(5);
    schema.with_column(DATE.into(), DataType::String);
    for name in PRICE_COLUMNS {
        schema.with_column(name.into(), DataType::Float32);
    }
    schema
}

/// Read the typed rows of a stock table, in table order
pub fn records(df: &DataFrame) -> Result<Vec<StockRecord>> {
    let date = df.column(DATE)?.as_materialized_series().str()?.clone();
    let open = price_column(df, OPEN)?;
    let high = price_column(df, HIGH)?;
    let low = price_column(df, LOW)?;
    let close = price_column(df, CLOSE)?;

    (0..df.height())
        .map(|i| {
            let missing = |name: &str| {
                ForecastError::Parse(format!("row {}: column '{name}' has no value", i + 1))
            };
            Ok::<_, ForecastError>(StockRecord {
                date: date.get(i).unwrap_or_default().to_owned(),
                open: open.get(i).ok_or_else(|| missing(OPEN))?,
                high: high.get(i).ok_or_else(|| missing(HIGH))?,
                low: low.get(i).ok_or_else(|| missing(LOW))?,
                close: close.get(i).ok_or_else(|| missing(CLOSE))?,
            })
        })
        .collect()
}

fn price_column(df: &DataFrame, name: &str) -> Result<Float32Chunked> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float32)?;
    Ok(series.f32()?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_positional() {
        let schema = stock_schema();
        let names: Vec<&str> = schema.iter_names().map(|s| s.as_str()).collect();
        assert_eq!(names, vec![DATE, OPEN, HIGH, LOW, CLOSE]);
        assert_eq!(schema.get(OPEN), Some(&DataType::Float32));
        assert_eq!(schema.get(DATE), Some(&DataType::String));
    }

    #[test]
    fn test_records_from_frame() -> Result<()> {
        let df = df!(
            DATE => &["2024-01-02", "2024-01-03"],
            OPEN => &[10.0f32, 11.0],
            HIGH => &[12.0f32, 13.0],
            LOW => &[9.0f32, 10.5],
            CLOSE => &[11.5f32, 12.0]
        )?;

        let rows = records(&df)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            StockRecord {
                date: "2024-01-03".to_owned(),
                open: 11.0,
                high: 13.0,
                low: 10.5,
                close: 12.0,
            }
        );
        Ok(())
    }

    #[test]
    fn test_records_reject_missing_price() -> Result<()> {
        let df = df!(
            DATE => &["2024-01-02"],
            OPEN => &[Some(10.0f32)],
            HIGH => &[Some(12.0f32)],
            LOW => &[None::<f32>],
            CLOSE => &[Some(11.0f32)]
        )?;

        let err = records(&df).unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)));
        assert!(err.to_string().contains("'Low'"));
        Ok(())
    }
}
