//! Plain-text rendering of chart views.

use fitplot_core::{format_value, ChartView, DatasetCollection, Domain, ResolvedMetrics};
use std::fmt::Write;

fn domain_text(domain: &Domain) -> String {
    match domain.bounds() {
        Some((min, max)) => format!("[{}, {}]", format_value(min), format_value(max)),
        None => "auto".to_string(),
    }
}

pub fn render_chart(view: &ChartView) -> String {
    let mut out = String::new();
    let title = if view.title.is_empty() {
        view.id.as_str()
    } else {
        view.title.as_str()
    };
    let _ = writeln!(out, "{title} ({:?})", view.kind);
    let _ = writeln!(out, "  x domain: {}", domain_text(&view.domains.x));
    if !view.domains.left_y.is_auto() {
        let _ = writeln!(out, "  y domain: {}", domain_text(&view.domains.left_y));
    }

    if view.series.is_empty() {
        let _ = writeln!(out, "  (no series)");
    }
    for s in &view.series {
        let _ = write!(
            out,
            "  - {} [{} {:?}/{:?}]: {} points",
            s.label,
            s.color,
            s.render,
            s.axis,
            s.points.len()
        );
        if s.dropped_rows > 0 {
            let _ = write!(out, ", {} unpaired rows", s.dropped_rows);
        }
        out.push('\n');
    }

    if !view.metrics.is_empty() {
        out.push_str(&render_metrics(&view.metrics));
    }
    out
}

pub fn render_metrics(rows: &[ResolvedMetrics]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<24} {:<24} {:>12} {:>12} {:>12} {:>6}",
        "series", "truth", "MAE", "RMSE", "R²", "n"
    );
    for m in rows {
        let _ = writeln!(
            out,
            "  {:<24} {:<24} {:>12} {:>12} {:>12} {:>6}",
            m.series_label,
            m.truth_label,
            format_value(m.mae),
            format_value(m.rmse),
            format_value(m.r2),
            m.n
        );
    }
    out
}

pub fn render_columns(datasets: &DatasetCollection) -> String {
    let mut out = String::new();
    for d in datasets.iter() {
        let _ = writeln!(
            out,
            "{} (id: {}, {} rows, {})",
            d.name(),
            d.id(),
            d.row_count(),
            d.color()
        );
        let numeric = d.numeric_columns();
        for c in d.columns() {
            let kind = if numeric.contains(&c.as_str()) {
                "numeric"
            } else {
                "text"
            };
            let _ = writeln!(out, "  {c} ({kind})");
        }
    }
    out
}
