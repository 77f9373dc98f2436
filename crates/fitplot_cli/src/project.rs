//! Project scaffolding

use anyhow::{Context, Result};
use fitplot_core::{ChartConfig, ChartKind, ColumnRef, SeriesConfig};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DatasetSource, FitplotConfig, PROJECT_FILE};

/// Create a starter project: a project file, two sample datasets and one
/// diagonal accuracy chart between them.
pub fn create_project(path: &Path, name: &str) -> Result<()> {
    if path.join(PROJECT_FILE).exists() {
        anyhow::bail!("{} already exists in {}", PROJECT_FILE, path.display());
    }
    fs::create_dir_all(path.join("data"))
        .with_context(|| format!("Failed to create {}", path.display()))?;

    fs::write(
        path.join("data/truth.json"),
        r#"[
  {"sample": 1, "measured": 0.8},
  {"sample": 2, "measured": 1.9},
  {"sample": 3, "measured": 3.1},
  {"sample": 4, "measured": 4.2}
]
"#,
    )?;
    fs::write(
        path.join("data/model.json"),
        r#"[
  {"sample": 1, "predicted": 1.0},
  {"sample": 2, "predicted": 2.1},
  {"sample": 3, "predicted": 2.7},
  {"sample": 4, "predicted": 4.4}
]
"#,
    )?;

    let mut config = FitplotConfig::new(name);
    config.datasets = vec![
        DatasetSource {
            name: "truth".to_string(),
            id: None,
            path: PathBuf::from("data/truth.json"),
            color: None,
        },
        DatasetSource {
            name: "model".to_string(),
            id: None,
            path: PathBuf::from("data/model.json"),
            color: None,
        },
    ];
    config.charts = vec![ChartConfig::new(
        "accuracy",
        "Predicted vs. measured",
        ColumnRef::new("truth", "measured"),
    )
    .with_kind(ChartKind::Diagonal)
    .with_metrics(true)
    .with_series(SeriesConfig::new("model", ColumnRef::new("model", "predicted")))];

    fs::write(path.join(PROJECT_FILE), config.to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Workspace;
    use fitplot_core::build_chart;

    #[test]
    fn scaffolded_project_renders() {
        let dir = tempfile::tempdir().unwrap();
        create_project(dir.path(), "demo").unwrap();
        assert!(create_project(dir.path(), "demo").is_err());

        let (config, base) = FitplotConfig::load(dir.path()).unwrap();
        let ws = Workspace::load(config, &base).unwrap();
        let view = build_chart(ws.chart("accuracy").unwrap(), &ws.datasets);
        assert_eq!(view.series[0].points.len(), 4);
        assert_eq!(view.metrics.len(), 1);
        assert_eq!(view.metrics[0].n, 4);
    }
}
