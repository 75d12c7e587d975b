//! Plain-text report lines.
//!
//! Each writer method emits whole lines; nothing is buffered beyond what the
//! underlying writer does.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::data::StockRecord;
use crate::error::Result;
use crate::evaluate::RegressionMetrics;

/// Actual versus predicted Close for one test row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub actual: f32,
    pub predicted: f32,
}

pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// `<Date> | <Open>` per row
    pub fn preview(&mut self, rows: &[StockRecord]) -> Result<()> {
        for row in rows {
            writeln!(self.out, "{} | {}", row.date, row.open)?;
        }
        Ok(())
    }

    pub fn metrics(&mut self, metrics: &RegressionMetrics) -> Result<()> {
        writeln!(self.out, "R-Squared: {}", metrics.r_squared)?;
        writeln!(
            self.out,
            "Root Mean Squared Error: {}",
            metrics.root_mean_squared_error
        )?;
        Ok(())
    }

    pub fn comparisons(&mut self, comparisons: &[Comparison]) -> Result<()> {
        for c in comparisons {
            writeln!(
                self.out,
                "Actual Close Price: {}, Predicted Close Price: {}",
                c.actual, c.predicted
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Reporter<Vec<u8>>) -> Result<()>) -> String {
        let mut reporter = Reporter::new(Vec::new());
        f(&mut reporter).expect("write to buffer");
        String::from_utf8(reporter.into_inner()).expect("utf8")
    }

    #[test]
    fn test_preview_lines() {
        let rows = vec![
            StockRecord {
                date: "2024-01-02".to_owned(),
                open: 187.15,
                high: 188.44,
                low: 183.89,
                close: 185.64,
            },
            StockRecord {
                date: "2024-01-03".to_owned(),
                open: 184.22,
                high: 185.88,
                low: 183.43,
                close: 184.25,
            },
        ];
        let text = render(|r| r.preview(&rows));
        assert_eq!(text, "2024-01-02 | 187.15\n2024-01-03 | 184.22\n");
    }

    #[test]
    fn test_metric_lines() {
        let metrics = RegressionMetrics {
            r_squared: 0.5,
            root_mean_squared_error: 1.25,
            mean_absolute_error: 1.0,
            mean_squared_error: 1.5625,
            loss_function: 1.5625,
        };
        let text = render(|r| r.metrics(&metrics));
        assert_eq!(text, "R-Squared: 0.5\nRoot Mean Squared Error: 1.25\n");
    }

    #[test]
    fn test_comparison_lines() {
        let text = render(|r| {
            r.comparisons(&[Comparison {
                actual: 101.0,
                predicted: 100.5,
            }])
        });
        assert_eq!(
            text,
            "Actual Close Price: 101, Predicted Close Price: 100.5\n"
        );
    }
}
