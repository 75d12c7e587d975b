//! Random train/test partition of a table.

use polars::prelude::*;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use rand::seq::SliceRandom as _;

use crate::error::{ForecastError, Result};

/// The two disjoint subsets produced by [`train_test_split`]
#[derive(Debug, Clone)]
pub struct TrainTestData {
    pub train_set: DataFrame,
    pub test_set: DataFrame,
}

/// Number of rows that go to the test subset
pub fn test_row_count(total: usize, test_fraction: f64) -> usize {
    ((total as f64 * test_fraction).round() as usize).min(total)
}

/// Shuffle row indices with `seed` and hold out `test_fraction` of them.
///
/// Every row lands in exactly one subset, and each subset keeps the original
/// row order.
///
/// # Errors
///
/// Returns [`ForecastError::Split`] for an empty table or a fraction outside `(0, 1)`
pub fn train_test_split(df: &DataFrame, test_fraction: f64, seed: u64) -> Result<TrainTestData> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ForecastError::Split(format!(
            "test fraction must be between 0 and 1, got {test_fraction}"
        )));
    }

    let total = df.height();
    if total == 0 {
        return Err(ForecastError::Split("cannot split an empty table".to_owned()));
    }

    let mut indices: Vec<IdxSize> = (0..total).map(|i| i as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(test_row_count(total, test_fraction));
    let mut test_idx = test_idx.to_vec();
    let mut train_idx = train_idx.to_vec();
    test_idx.sort_unstable();
    train_idx.sort_unstable();

    tracing::info!(
        "Split {total} rows into {} training and {} test rows (seed {seed})",
        train_idx.len(),
        test_idx.len()
    );

    Ok(TrainTestData {
        train_set: df.take(&IdxCa::from_vec("train".into(), train_idx))?,
        test_set: df.take(&IdxCa::from_vec("test".into(), test_idx))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn frame(rows: usize) -> DataFrame {
        let ids: Vec<String> = (0..rows).map(|i| format!("row-{i}")).collect();
        let values: Vec<f32> = (0..rows).map(|i| i as f32).collect();
        df!("id" => ids, "value" => values).expect("frame")
    }

    fn ids(df: &DataFrame) -> Vec<String> {
        df.column("id")
            .expect("id column")
            .as_materialized_series()
            .str()
            .expect("string column")
            .into_iter()
            .map(|v| v.unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn test_split_is_a_partition() -> Result<()> {
        let df = frame(57);
        let split = train_test_split(&df, 0.2, 11)?;

        assert_eq!(split.train_set.height() + split.test_set.height(), 57);

        let train: HashSet<String> = ids(&split.train_set).into_iter().collect();
        let test: HashSet<String> = ids(&split.test_set).into_iter().collect();
        assert!(train.is_disjoint(&test));
        assert_eq!(train.union(&test).count(), 57);
        Ok(())
    }

    #[test]
    fn test_split_fraction() -> Result<()> {
        for total in [5, 10, 23, 100, 1001] {
            let split = train_test_split(&frame(total), 0.2, 3)?;
            let expected = total as f64 * 0.2;
            assert!(
                (split.test_set.height() as f64 - expected).abs() <= 1.0,
                "{total} rows gave {} test rows",
                split.test_set.height()
            );
        }
        Ok(())
    }

    #[test]
    fn test_same_seed_same_split() -> Result<()> {
        let df = frame(40);
        let a = train_test_split(&df, 0.2, 99)?;
        let b = train_test_split(&df, 0.2, 99)?;
        assert_eq!(ids(&a.test_set), ids(&b.test_set));
        Ok(())
    }

    #[test]
    fn test_subsets_keep_row_order() -> Result<()> {
        let split = train_test_split(&frame(30), 0.2, 5)?;
        let values: Vec<f32> = split
            .train_set
            .column("value")?
            .as_materialized_series()
            .f32()?
            .into_no_null_iter()
            .collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }

    #[test]
    fn test_empty_table_fails() {
        let err = train_test_split(&frame(0), 0.2, 1).unwrap_err();
        assert!(matches!(err, ForecastError::Split(_)));
    }

    #[test]
    fn test_bad_fraction_fails() {
        assert!(train_test_split(&frame(10), 0.0, 1).is_err());
        assert!(train_test_split(&frame(10), 1.0, 1).is_err());
    }
}
