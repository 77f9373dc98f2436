use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CollectionError;

/// Stable identifier of a loaded dataset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DatasetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single cell as handed over by the loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric view of the cell.
    ///
    /// Strings are trimmed and parsed; anything else that is not a number
    /// (null, empty or unparseable text) becomes `NaN` so the row position survives.
    pub fn as_f64(&self) -> f64 {
        match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            CellValue::Null => f64::NAN,
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

/// Schemaless row: column name to value, in column order.
pub type Row = IndexMap<String, CellValue>;

/// An immutable, loaded table.
///
/// Datasets are never patched in place; a reload produces a new `Dataset`
/// that replaces the old one in the [`DatasetCollection`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    id: DatasetId,
    name: String,
    rows: Vec<Row>,
    columns: Vec<String>,
    color: String,
}

impl Dataset {
    /// Build a dataset, discovering columns from row keys in first-seen order.
    pub fn new(
        id: impl Into<DatasetId>,
        name: impl Into<String>,
        rows: Vec<Row>,
        color: impl Into<String>,
    ) -> Self {
        let mut columns: IndexSet<&str> = IndexSet::new();
        for row in &rows {
            for key in row.keys() {
                columns.insert(key.as_str());
            }
        }
        let columns = columns.into_iter().map(str::to_string).collect();
        Self {
            id: id.into(),
            name: name.into(),
            rows,
            columns,
            color: color.into(),
        }
    }

    /// Build a dataset with an explicit column order.
    ///
    /// Every row key must appear in `columns`; rows may omit columns.
    pub fn with_columns(
        id: impl Into<DatasetId>,
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
        color: impl Into<String>,
    ) -> Result<Self, CollectionError> {
        let name = name.into();
        let known: IndexSet<&str> = columns.iter().map(String::as_str).collect();
        for row in &rows {
            if let Some(key) = row.keys().find(|k| !known.contains(k.as_str())) {
                return Err(CollectionError::UnknownColumn {
                    dataset: name,
                    column: key.clone(),
                });
            }
        }
        Ok(Self {
            id: id.into(),
            name,
            rows,
            columns,
            color: color.into(),
        })
    }

    pub fn id(&self) -> &DatasetId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Columns holding at least one finite numeric value, in column order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| {
                self.rows
                    .iter()
                    .any(|r| r.get(c.as_str()).is_some_and(|v| v.as_f64().is_finite()))
            })
            .map(String::as_str)
            .collect()
    }
}

/// The live set of loaded datasets, in load order.
#[derive(Clone, Debug, Default)]
pub struct DatasetCollection {
    datasets: IndexMap<DatasetId, Arc<Dataset>>,
}

impl DatasetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn get(&self, id: &DatasetId) -> Option<&Arc<Dataset>> {
        self.datasets.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Dataset>> {
        self.datasets.values()
    }

    /// Add a freshly loaded dataset. Ids and names must be unique.
    pub fn insert(&mut self, dataset: Dataset) -> Result<Arc<Dataset>, CollectionError> {
        if self.datasets.contains_key(dataset.id()) {
            return Err(CollectionError::DuplicateId(dataset.id().to_string()));
        }
        if self.iter().any(|d| d.name() == dataset.name()) {
            return Err(CollectionError::DuplicateName(dataset.name().to_string()));
        }
        debug!(
            "DatasetCollection::insert: {} ({} rows, {} columns)",
            dataset.id(),
            dataset.row_count(),
            dataset.columns().len()
        );
        let dataset = Arc::new(dataset);
        self.datasets
            .insert(dataset.id().clone(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Swap an existing dataset wholesale, keeping its position.
    ///
    /// Inserts when the id is not loaded yet. Returns the previous value.
    pub fn replace(&mut self, dataset: Dataset) -> Result<Option<Arc<Dataset>>, CollectionError> {
        if self
            .iter()
            .any(|d| d.id() != dataset.id() && d.name() == dataset.name())
        {
            return Err(CollectionError::DuplicateName(dataset.name().to_string()));
        }
        debug!("DatasetCollection::replace: {}", dataset.id());
        Ok(self
            .datasets
            .insert(dataset.id().clone(), Arc::new(dataset)))
    }

    /// Drop a dataset. Chart configurations referring to it are left alone
    /// and simply resolve to no data until repointed.
    pub fn remove(&mut self, id: &DatasetId) -> Option<Arc<Dataset>> {
        let removed = self.datasets.shift_remove(id);
        if removed.is_some() {
            debug!("DatasetCollection::remove: {}", id);
        }
        removed
    }

    /// Display colors currently held by datasets.
    pub fn used_colors(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|d| d.color())
    }

    /// A name derived from `base` that no loaded dataset uses yet.
    pub fn unique_name(&self, base: &str) -> String {
        let taken = |n: &str| self.iter().any(|d| d.name() == n);
        if !taken(base) {
            return base.to_string();
        }
        (2usize..)
            .map(|i| format!("{base} ({i})"))
            .find(|n| !taken(n))
            .unwrap_or_else(|| base.to_string())
    }
}

impl FromIterator<Dataset> for DatasetCollection {
    /// Collects datasets, skipping any whose id or name clashes with an earlier one.
    fn from_iter<I: IntoIterator<Item = Dataset>>(iter: I) -> Self {
        let mut out = Self::new();
        for d in iter {
            if let Err(err) = out.insert(d) {
                debug!("DatasetCollection::from_iter: skipped ({err})");
            }
        }
        out
    }
}
