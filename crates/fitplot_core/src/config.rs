//! Chart and series configuration.
//!
//! These are plain values edited by the host UI and replaced wholesale on every
//! change. Column references are soft: they may name datasets that are not (or
//! no longer) loaded, in which case they resolve to no data.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::color::next_color;
use crate::dataset::{Dataset, DatasetId};

/// A `(dataset, column)` reference into the live dataset collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(rename = "dataset")]
    pub dataset_id: DatasetId,
    pub column: String,
}

impl ColumnRef {
    pub fn new(dataset_id: impl Into<DatasetId>, column: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            column: column.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    #[default]
    Line,
    Scatter,
    Area,
    Bar,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    General,
    /// Truth vs. prediction scatter with a y = x reference line.
    Diagonal,
}

/// One plotted series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub id: String,
    pub y: ColumnRef,
    /// Overrides the chart's x reference when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<ColumnRef>,
    #[serde(default)]
    pub axis: Axis,
    /// Opaque display color. Empty means "not assigned yet".
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub render: RenderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SeriesConfig {
    pub fn new(id: impl Into<String>, y: ColumnRef) -> Self {
        Self {
            id: id.into(),
            y,
            x: None,
            axis: Axis::Left,
            color: String::new(),
            render: RenderKind::Line,
            label: None,
        }
    }

    pub fn with_x(mut self, x: ColumnRef) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_render(mut self, render: RenderKind) -> Self {
        self.render = render;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn default_true() -> bool {
    true
}

/// A chart: shared x reference, ordered series and display flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub kind: ChartKind,
    pub x: ColumnRef,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
    #[serde(default)]
    pub show_metrics: bool,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub show_legend: bool,
}

impl ChartConfig {
    pub fn new(id: impl Into<String>, title: impl Into<String>, x: ColumnRef) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: ChartKind::General,
            x,
            series: Vec::new(),
            show_metrics: false,
            show_grid: true,
            show_legend: true,
        }
    }

    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_series(mut self, series: SeriesConfig) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_metrics(mut self, show: bool) -> Self {
        self.show_metrics = show;
        self
    }

    /// A one-series chart over a single dataset: first numeric column as x,
    /// second numeric column as y.
    ///
    /// Returns `None` when the dataset has fewer than two numeric columns.
    pub fn default_for<'a>(
        dataset: &Dataset,
        used_colors: impl IntoIterator<Item = &'a str>,
    ) -> Option<Self> {
        let numeric = dataset.numeric_columns();
        let (&x, &y) = (numeric.first()?, numeric.get(1)?);
        let id = dataset.id().clone();
        let series = SeriesConfig::new(format!("{id}-{y}"), ColumnRef::new(id.clone(), y))
            .with_color(next_color(used_colors));
        Some(
            Self::new(format!("{id}-chart"), dataset.name(), ColumnRef::new(id, x))
                .with_series(series),
        )
    }

    /// The x reference a series is plotted against.
    pub fn effective_x<'a>(&'a self, series: &'a SeriesConfig) -> &'a ColumnRef {
        series.x.as_ref().unwrap_or(&self.x)
    }

    /// Diagonal charts draw every series as a scatter.
    pub fn effective_render(&self, series: &SeriesConfig) -> RenderKind {
        match self.kind {
            ChartKind::Diagonal => RenderKind::Scatter,
            ChartKind::General => series.render,
        }
    }

    /// Distinct dataset ids referenced anywhere in the chart, in first-use order.
    pub fn referenced_datasets(&self) -> Vec<&DatasetId> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let refs = std::iter::once(&self.x).chain(
            self.series
                .iter()
                .flat_map(|s| s.x.iter().chain(std::iter::once(&s.y))),
        );
        for r in refs {
            if seen.insert(&r.dataset_id) {
                out.push(&r.dataset_id);
            }
        }
        out
    }

    /// Give every series without a color the next free palette color.
    pub fn assign_missing_colors(&mut self, used: &mut Vec<String>) {
        used.extend(
            self.series
                .iter()
                .filter(|s| !s.color.is_empty())
                .map(|s| s.color.clone()),
        );
        for series in self.series.iter_mut().filter(|s| s.color.is_empty()) {
            let color = next_color(used.iter().map(String::as_str));
            used.push(color.clone());
            series.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PALETTE;
    use crate::dataset::test_util::numeric;

    #[test]
    fn series_x_override_wins() {
        let chart = ChartConfig::new("c", "", ColumnRef::new("a", "t"));
        let plain = SeriesConfig::new("s1", ColumnRef::new("a", "y"));
        let over = plain.clone().with_x(ColumnRef::new("b", "t2"));
        assert_eq!(chart.effective_x(&plain), &ColumnRef::new("a", "t"));
        assert_eq!(chart.effective_x(&over), &ColumnRef::new("b", "t2"));
    }

    #[test]
    fn diagonal_forces_scatter() {
        let s = SeriesConfig::new("s", ColumnRef::new("a", "y")).with_render(RenderKind::Bar);
        let general = ChartConfig::new("c", "", ColumnRef::new("a", "x"));
        let diagonal = general.clone().with_kind(ChartKind::Diagonal);
        assert_eq!(general.effective_render(&s), RenderKind::Bar);
        assert_eq!(diagonal.effective_render(&s), RenderKind::Scatter);
    }

    #[test]
    fn referenced_datasets_are_distinct_and_ordered() {
        let chart = ChartConfig::new("c", "", ColumnRef::new("a", "x"))
            .with_series(SeriesConfig::new("1", ColumnRef::new("b", "y")))
            .with_series(
                SeriesConfig::new("2", ColumnRef::new("a", "y")).with_x(ColumnRef::new("c", "x")),
            );
        let ids: Vec<&str> = chart
            .referenced_datasets()
            .into_iter()
            .map(DatasetId::as_str)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn default_chart_uses_first_two_numeric_columns() {
        let d = numeric("runs", &[("t", &[0.0, 1.0]), ("v", &[2.0, 3.0]), ("w", &[1.0, 1.0])]);
        let chart = ChartConfig::default_for(&d, [PALETTE[0]]).unwrap();
        assert_eq!(chart.x, ColumnRef::new("runs", "t"));
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].y, ColumnRef::new("runs", "v"));
        assert_eq!(chart.series[0].color, PALETTE[1]);

        let single = numeric("one", &[("t", &[0.0])]);
        assert!(ChartConfig::default_for(&single, Vec::<&str>::new()).is_none());
    }

    #[test]
    fn missing_colors_are_allocated_without_repeats() {
        let mut chart = ChartConfig::new("c", "", ColumnRef::new("a", "x"))
            .with_series(SeriesConfig::new("1", ColumnRef::new("a", "y")))
            .with_series(SeriesConfig::new("2", ColumnRef::new("a", "z")).with_color(PALETTE[0]))
            .with_series(SeriesConfig::new("3", ColumnRef::new("a", "w")));
        let mut used = Vec::new();
        chart.assign_missing_colors(&mut used);
        assert_eq!(chart.series[0].color, PALETTE[1]);
        assert_eq!(chart.series[1].color, PALETTE[0]);
        assert_eq!(chart.series[2].color, PALETTE[2]);
    }
}
