//! Price file loading.
//!
//! The file has no header and five positional columns
//! (Date, Open, High, Low, Close). [`StockLoader::load`] reads the whole file
//! into a polars `DataFrame`, failing on the first malformed row, while
//! [`StockLoader::preview`] only scans the leading rows.

pub mod loader;
pub mod schema;

pub use loader::StockLoader;
pub use schema::{CLOSE, DATE, HIGH, LOW, OPEN, PRICE_COLUMNS, StockRecord, records, stock_schema};
