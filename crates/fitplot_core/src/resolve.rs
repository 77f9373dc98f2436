use tracing::trace;

use crate::config::ColumnRef;
use crate::dataset::DatasetCollection;

/// A column pulled out of a dataset as numbers, one per row.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedColumn {
    /// `NaN` marks cells that are null, missing or not numeric.
    pub values: Vec<f64>,
    /// Raw column name.
    pub label: String,
}

impl ResolvedColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn finite(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }
}

/// Resolve a column reference against the loaded datasets.
///
/// Returns `None` only when the dataset is not loaded. A missing column still
/// resolves, to all-`NaN` values, so the output always has one value per row.
pub fn resolve(col: &ColumnRef, datasets: &DatasetCollection) -> Option<ResolvedColumn> {
    let Some(dataset) = datasets.get(&col.dataset_id) else {
        trace!("resolve: dataset `{}` is not loaded", col.dataset_id);
        return None;
    };
    let values = dataset
        .rows()
        .iter()
        .map(|row| row.get(&col.column).map_or(f64::NAN, |v| v.as_f64()))
        .collect();
    Some(ResolvedColumn {
        values,
        label: col.column.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::test_util::{numeric, row};
    use crate::dataset::{CellValue, Dataset};

    fn mixed() -> DatasetCollection {
        let rows = vec![
            row(&[("v", 1.0.into())]),
            row(&[("v", "2.5".into())]),
            row(&[("v", CellValue::Null)]),
            row(&[("v", "n/a".into())]),
            row(&[("other", 9.0.into())]),
        ];
        [Dataset::new("m", "m", rows, "#000000")].into_iter().collect()
    }

    #[test]
    fn coerces_and_keeps_positions() {
        let col = resolve(&ColumnRef::new("m", "v"), &mixed()).unwrap();
        assert_eq!(col.label, "v");
        assert_eq!(col.len(), 5);
        assert_eq!(col.values[0], 1.0);
        assert_eq!(col.values[1], 2.5);
        assert!(col.values[2..].iter().all(|v| v.is_nan()));
        assert_eq!(col.finite().count(), 2);
    }

    #[test]
    fn missing_dataset_is_none() {
        assert!(resolve(&ColumnRef::new("gone", "v"), &mixed()).is_none());
    }

    #[test]
    fn missing_column_is_all_nan() {
        let col = resolve(&ColumnRef::new("m", "nope"), &mixed()).unwrap();
        assert_eq!(col.len(), 5);
        assert!(col.values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn length_matches_row_count() {
        let d = numeric("a", &[("x", &[1.0, 2.0, 3.0]), ("y", &[1.0])]);
        let rows = d.row_count();
        let datasets: DatasetCollection = [d].into_iter().collect();
        for column in ["x", "y", "z"] {
            let col = resolve(&ColumnRef::new("a", column), &datasets).unwrap();
            assert_eq!(col.len(), rows);
        }
    }
}
