//! Chart orchestration: turns a [`ChartConfig`] and the loaded datasets into a
//! render-ready [`ChartView`].
//!
//! Everything here is total. A half-configured chart (dangling references, no
//! series, nothing numeric) still produces a view, just an emptier one.

use serde::Serialize;
use tracing::debug;

use crate::config::{Axis, ChartConfig, ChartKind, ColumnRef, RenderKind, SeriesConfig};
use crate::dataset::DatasetCollection;
use crate::domain::{compute_domains, ChartDomains};
use crate::metrics::{self, ResolvedMetrics};
use crate::resolve::resolve;
use crate::series::{join_columns, DataPoint, SeriesPoints};

/// One series, ready to draw.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesView {
    pub id: String,
    pub label: String,
    pub color: String,
    /// Effective kind; always `Scatter` on diagonal charts.
    pub render: RenderKind,
    pub axis: Axis,
    pub points: Vec<DataPoint>,
    /// Rows the index-based pairing dropped because x and y lengths differ.
    pub dropped_rows: usize,
}

/// Everything the renderer needs for one chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartView {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub domains: ChartDomains,
    pub series: Vec<SeriesView>,
    /// Empty unless the chart asks for metrics.
    pub metrics: Vec<ResolvedMetrics>,
    /// `y = x` segment across the shared domain, diagonal charts only.
    pub reference_line: Option<[DataPoint; 2]>,
    pub show_grid: bool,
    pub show_legend: bool,
}

impl ChartView {
    /// True when no series has a single point to draw.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    pub fn total_points(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Display label for a column.
///
/// Charts that span several datasets prefix the dataset name so legend
/// entries stay distinguishable; a dataset that is gone falls back to its id.
fn column_label(col: &ColumnRef, datasets: &DatasetCollection, prefixed: bool) -> String {
    if !prefixed {
        return col.column.clone();
    }
    match datasets.get(&col.dataset_id) {
        Some(d) => format!("{}: {}", d.name(), col.column),
        None => format!("{}: {}", col.dataset_id, col.column),
    }
}

fn series_label(series: &SeriesConfig, datasets: &DatasetCollection, prefixed: bool) -> String {
    match &series.label {
        Some(label) if !label.is_empty() => label.clone(),
        _ => column_label(&series.y, datasets, prefixed),
    }
}

/// Build the view model for a chart.
///
/// Series points, shared domains, and (when `show_metrics` is set) one metrics
/// row per series whose truth/prediction columns resolve to at least one finite pair.
pub fn build_chart(chart: &ChartConfig, datasets: &DatasetCollection) -> ChartView {
    let prefixed = chart.referenced_datasets().len() > 1;
    let mut series_views = Vec::with_capacity(chart.series.len());
    let mut metrics_rows = Vec::new();

    for series in &chart.series {
        let label = series_label(series, datasets, prefixed);
        let x_ref = chart.effective_x(series);
        let resolved = (resolve(x_ref, datasets), resolve(&series.y, datasets));

        let SeriesPoints {
            points,
            dropped_rows,
        } = match &resolved {
            (Some(x), Some(y)) => join_columns(&series.id, x, y),
            _ => {
                debug!("chart `{}`: series `{}` has no data", chart.id, series.id);
                SeriesPoints::default()
            }
        };

        if chart.show_metrics {
            if let (Some(truth), Some(pred)) = &resolved {
                let truth_label = column_label(x_ref, datasets, prefixed);
                metrics_rows.extend(metrics::compute(
                    &truth.values,
                    &pred.values,
                    &label,
                    &truth_label,
                ));
            }
        }

        series_views.push(SeriesView {
            id: series.id.clone(),
            label,
            color: series.color.clone(),
            render: chart.effective_render(series),
            axis: series.axis,
            points,
            dropped_rows,
        });
    }

    let domains = compute_domains(chart, datasets);
    let reference_line = match (chart.kind, domains.x.bounds()) {
        (ChartKind::Diagonal, Some((min, max))) => {
            Some([DataPoint::new(min, min), DataPoint::new(max, max)])
        }
        _ => None,
    };

    ChartView {
        id: chart.id.clone(),
        title: chart.title.clone(),
        kind: chart.kind,
        domains,
        series: series_views,
        metrics: metrics_rows,
        reference_line,
        show_grid: chart.show_grid,
        show_legend: chart.show_legend,
    }
}
