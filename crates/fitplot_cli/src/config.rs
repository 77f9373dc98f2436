//! fitplot project file handling

use anyhow::{Context, Result};
use fitplot_core::ChartConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_FILE: &str = "fitplot.toml";

/// Top-level project configuration (fitplot.toml)
#[derive(Debug, Deserialize, Serialize)]
pub struct FitplotConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub datasets: Vec<DatasetSource>,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

/// Project metadata
#[derive(Debug, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Report output settings
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A rows file to load as a dataset
#[derive(Debug, Deserialize, Serialize)]
pub struct DatasetSource {
    pub name: String,
    /// Defaults to the name
    #[serde(default)]
    pub id: Option<String>,
    /// JSON array of row objects, relative to the project file
    pub path: PathBuf,
    /// Allocated from the palette when absent
    #[serde(default)]
    pub color: Option<String>,
}

impl DatasetSource {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }
}

impl FitplotConfig {
    /// Load configuration from a file or a directory containing fitplot.toml.
    ///
    /// Returns the config and the directory relative paths resolve against.
    pub fn load(path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(PROJECT_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `fitplot init` to create one.",
                PROJECT_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let base = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok((config, base))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Create a new configuration with the given project name
    pub fn new(name: &str) -> Self {
        Self {
            project: ProjectConfig {
                name: name.to_string(),
                description: None,
            },
            output: OutputConfig::default(),
            datasets: Vec::new(),
            charts: Vec::new(),
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitplot_core::{ChartKind, ColumnRef, RenderKind};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r##"
[project]
name = "demo"

[output]
format = "json"

[[datasets]]
name = "truth"
path = "data/truth.json"

[[datasets]]
name = "model"
id = "m1"
path = "data/model.json"
color = "#ff0000"

[[charts]]
id = "acc"
title = "Accuracy"
kind = "diagonal"
show_metrics = true
x = { dataset = "truth", column = "t" }

[[charts.series]]
id = "pred"
y = { dataset = "m1", column = "p" }
render = "area"
label = "Model 1"
"##;

    #[test]
    fn parses_full_project() {
        let config = FitplotConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.project.name, "demo");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.datasets.len(), 2);
        assert_eq!(config.datasets[0].id(), "truth");
        assert_eq!(config.datasets[1].id(), "m1");

        let chart = &config.charts[0];
        assert_eq!(chart.kind, ChartKind::Diagonal);
        assert!(chart.show_metrics);
        assert!(chart.show_grid);
        assert!(chart.show_legend);
        assert_eq!(chart.x, ColumnRef::new("truth", "t"));
        assert_eq!(chart.series[0].render, RenderKind::Area);
        assert_eq!(chart.series[0].label.as_deref(), Some("Model 1"));
        assert!(chart.series[0].color.is_empty());
    }

    #[test]
    fn minimal_project_uses_defaults() {
        let config = FitplotConfig::parse("[project]\nname = \"x\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.datasets.is_empty());
        assert!(config.charts.is_empty());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = FitplotConfig::parse(SAMPLE).unwrap();
        let again = FitplotConfig::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(again.charts, config.charts);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = FitplotConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("fitplot init"));
    }
}
