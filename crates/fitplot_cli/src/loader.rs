//! Loads the datasets and charts named by a project file.

use anyhow::{Context, Result};
use fitplot_core::{next_color, CellValue, ChartConfig, Dataset, DatasetCollection, Row};
use rustc_hash::FxHashSet;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{DatasetSource, FitplotConfig};

/// Datasets and charts ready to render.
pub struct Workspace {
    pub datasets: DatasetCollection,
    pub charts: Vec<ChartConfig>,
}

impl Workspace {
    pub fn load(config: FitplotConfig, base: &Path) -> Result<Self> {
        let mut datasets = DatasetCollection::new();
        for source in &config.datasets {
            let color = match &source.color {
                Some(c) => c.clone(),
                None => next_color(datasets.used_colors()),
            };
            let dataset = load_dataset(source, base, color)?;
            datasets
                .insert(dataset)
                .with_context(|| format!("Failed to add dataset `{}`", source.name))?;
        }

        let mut charts = config.charts;
        check_unique_ids(&charts)?;
        let mut used: Vec<String> = datasets.used_colors().map(str::to_string).collect();
        for chart in &mut charts {
            chart.assign_missing_colors(&mut used);
        }

        info!(
            "loaded {} dataset(s), {} chart(s)",
            datasets.len(),
            charts.len()
        );
        Ok(Self { datasets, charts })
    }

    pub fn chart(&self, id: &str) -> Option<&ChartConfig> {
        self.charts.iter().find(|c| c.id == id)
    }
}

/// Chart ids must be unique in the project, series ids unique within a chart.
fn check_unique_ids(charts: &[ChartConfig]) -> Result<()> {
    let mut chart_ids = FxHashSet::default();
    for chart in charts {
        if !chart_ids.insert(chart.id.as_str()) {
            anyhow::bail!("Duplicate chart id `{}`", chart.id);
        }
        let mut series_ids = FxHashSet::default();
        for series in &chart.series {
            if !series_ids.insert(series.id.as_str()) {
                anyhow::bail!("Duplicate series id `{}` in chart `{}`", series.id, chart.id);
            }
        }
    }
    Ok(())
}

/// Read one rows file: a JSON array of objects.
pub fn load_dataset(source: &DatasetSource, base: &Path, color: String) -> Result<Dataset> {
    let path = base.join(&source.path);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let rows = parse_rows(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!("{}: {} rows", path.display(), rows.len());
    Ok(Dataset::new(source.id(), source.name.as_str(), rows, color))
}

pub fn parse_rows(content: &str) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        anyhow::bail!("expected a JSON array of row objects");
    };
    let mut rows = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(fields) => rows.push(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, cell_from_json(v)))
                    .collect::<Row>(),
            ),
            other => anyhow::bail!("row {i} is not an object: {other}"),
        }
    }
    Ok(rows)
}

fn cell_from_json(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Number(n) => n.as_f64().map_or(CellValue::Null, CellValue::Number),
        Value::String(s) => CellValue::Text(s),
        other => CellValue::Text(other.to_string()),
    }
}
