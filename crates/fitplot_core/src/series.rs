use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::config::{ChartConfig, SeriesConfig};
use crate::dataset::DatasetCollection;
use crate::resolve::{resolve, ResolvedColumn};

/// A plotted point in data units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Points of one series plus what the positional join threw away.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesPoints {
    /// Finite pairs, sorted by `x`; equal `x` keeps row order.
    pub points: Vec<DataPoint>,
    /// Rows of the longer column that had no partner at the same index.
    pub dropped_rows: usize,
}

/// Build the aligned point sequence for one series.
///
/// Empty when either the x or the y dataset is not loaded.
pub fn build(
    series: &SeriesConfig,
    chart: &ChartConfig,
    datasets: &DatasetCollection,
) -> Vec<DataPoint> {
    build_with_stats(series, chart, datasets).points
}

/// [`build`], also reporting how many rows the positional join dropped.
pub fn build_with_stats(
    series: &SeriesConfig,
    chart: &ChartConfig,
    datasets: &DatasetCollection,
) -> SeriesPoints {
    let x_ref = chart.effective_x(series);
    match (resolve(x_ref, datasets), resolve(&series.y, datasets)) {
        (Some(x), Some(y)) => join_columns(&series.id, &x, &y),
        _ => SeriesPoints::default(),
    }
}

/// Join two already-resolved columns into series points.
pub fn join_columns(series_id: &str, x: &ResolvedColumn, y: &ResolvedColumn) -> SeriesPoints {
    let dropped_rows = x.len().abs_diff(y.len());
    if dropped_rows > 0 {
        debug!(
            "series `{}`: x has {} rows, y has {}; pairing by row index drops {}",
            series_id,
            x.len(),
            y.len(),
            dropped_rows
        );
    }

    SeriesPoints {
        points: pair_points(&x.values, &y.values),
        dropped_rows,
    }
}

/// Pair `x[i]` with `y[i]`, keep finite pairs, stable-sort by `x`.
///
/// The shorter input bounds the result; this is a row-index join, not a key join.
pub fn pair_points(x: &[f64], y: &[f64]) -> Vec<DataPoint> {
    let mut points: Vec<DataPoint> = x
        .iter()
        .zip(y)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| DataPoint::new(x, y))
        .collect();
    // `sort_by` is stable; equal x must keep row order or lines zig-zag.
    points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    points
}
