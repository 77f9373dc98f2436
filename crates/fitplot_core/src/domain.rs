use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::trace;

use crate::config::{ChartConfig, ChartKind, ColumnRef};
use crate::dataset::DatasetCollection;
use crate::resolve::resolve;

/// Fraction of the data range added on each side of an axis.
pub const DOMAIN_PADDING: f64 = 0.05;

/// Half-width used when every observed value is identical.
pub const DEGENERATE_HALF_WIDTH: f64 = 1.0;

/// Numeric axis domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Nothing to constrain the axis; the renderer picks its own scale.
    #[default]
    Auto,
    Range { min: f64, max: f64 },
}

impl Domain {
    /// Pad an observed extent for display.
    ///
    /// A zero-width extent widens to `±1`, anything else gains 5% of its
    /// range on both ends. An empty extent is [`Domain::Auto`].
    pub fn padded(extent: Extent) -> Self {
        let Some((min, max)) = extent.bounds() else {
            return Domain::Auto;
        };
        let range = max - min;
        if range == 0.0 {
            return Domain::Range {
                min: min - DEGENERATE_HALF_WIDTH,
                max: max + DEGENERATE_HALF_WIDTH,
            };
        }
        // The span of two huge values of opposite sign overflows; pad each end
        // separately then and keep the bounds finite.
        let pad = if range.is_finite() {
            range * DOMAIN_PADDING
        } else {
            max * DOMAIN_PADDING - min * DOMAIN_PADDING
        };
        Domain::Range {
            min: (min - pad).max(f64::MIN),
            max: (max + pad).min(f64::MAX),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Domain::Auto)
    }

    pub fn bounds(&self) -> Option<(f64, f64)> {
        match *self {
            Domain::Auto => None,
            Domain::Range { min, max } => Some((min, max)),
        }
    }
}

/// Running min/max over finite values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    min: f64,
    max: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Extent {
    /// Fold a value in; non-finite values are ignored.
    pub fn observe(&mut self, v: f64) {
        if v.is_finite() {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn bounds(&self) -> Option<(f64, f64)> {
        (!self.is_empty()).then_some((self.min, self.max))
    }
}

impl Extend<f64> for Extent {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for v in iter {
            self.observe(v);
        }
    }
}

impl FromIterator<f64> for Extent {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut e = Extent::default();
        e.extend(iter);
        e
    }
}

/// Axis domains for one chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ChartDomains {
    pub x: Domain,
    /// Equal to `x` on diagonal charts, otherwise left to the renderer.
    pub left_y: Domain,
    pub right_y: Domain,
}

/// Column references that feed the x-axis scan, deduplicated, in first-use order.
///
/// Diagonal charts also fold in every series' y reference so the identity line
/// spans both truth and prediction values.
pub fn domain_refs(chart: &ChartConfig) -> Vec<&ColumnRef> {
    let mut seen = FxHashSet::default();
    let mut refs = Vec::new();
    let x_refs = std::iter::once(&chart.x).chain(chart.series.iter().filter_map(|s| s.x.as_ref()));
    let y_refs = chart
        .series
        .iter()
        .filter(|_| chart.kind == ChartKind::Diagonal)
        .map(|s| &s.y);
    for r in x_refs.chain(y_refs) {
        if seen.insert(r) {
            refs.push(r);
        }
    }
    refs
}

/// Shared x domain across every series of the chart.
pub fn compute_x_domain(chart: &ChartConfig, datasets: &DatasetCollection) -> Domain {
    let mut extent = Extent::default();
    for r in domain_refs(chart) {
        if let Some(col) = resolve(r, datasets) {
            extent.extend(col.values.iter().copied());
        }
    }
    let domain = Domain::padded(extent);
    trace!("chart `{}`: x domain {:?}", chart.id, domain);
    domain
}

/// All axis domains of a chart.
pub fn compute_domains(chart: &ChartConfig, datasets: &DatasetCollection) -> ChartDomains {
    let x = compute_x_domain(chart, datasets);
    let left_y = match chart.kind {
        ChartKind::Diagonal => x,
        ChartKind::General => Domain::Auto,
    };
    ChartDomains {
        x,
        left_y,
        right_y: Domain::Auto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeriesConfig;
    use crate::dataset::test_util::numeric;

    fn padded(values: &[f64]) -> Domain {
        Domain::padded(values.iter().copied().collect())
    }

    #[test]
    fn identical_values_widen_by_one() {
        assert_eq!(padded(&[10.0, 10.0, 10.0]), Domain::Range { min: 9.0, max: 11.0 });
        assert_eq!(padded(&[-3.0]), Domain::Range { min: -4.0, max: -2.0 });
    }

    #[test]
    fn range_is_padded_by_five_percent() {
        assert_eq!(padded(&[0.0, 100.0]), Domain::Range { min: -5.0, max: 105.0 });
        assert_eq!(padded(&[100.0, 0.0, 50.0]), Domain::Range { min: -5.0, max: 105.0 });
    }

    #[test]
    fn huge_extents_stay_finite() {
        for values in [[-1e308, 1e308], [f64::MAX, -f64::MAX], [0.0, f64::MAX]] {
            let (min, max) = padded(&values).bounds().unwrap();
            assert!(min.is_finite() && max.is_finite(), "{values:?}");
            assert!(min <= values[0].min(values[1]));
            assert!(max >= values[0].max(values[1]));
        }
        let (min, max) = padded(&[-1e308, 1e308]).bounds().unwrap();
        assert!(min < -1e308 && max > 1e308);
    }

    #[test]
    fn non_finite_only_is_auto() {
        assert_eq!(padded(&[]), Domain::Auto);
        assert_eq!(padded(&[f64::NAN, f64::INFINITY]), Domain::Auto);
        assert_eq!(padded(&[f64::NAN, 2.0, f64::NEG_INFINITY]), Domain::Range { min: 1.0, max: 3.0 });
    }

    fn chart_over(kind: ChartKind) -> (ChartConfig, DatasetCollection) {
        let truth = numeric("t", &[("x", &[0.0, 10.0]), ("alt", &[-10.0, 0.0])]);
        let pred = numeric("p", &[("y", &[20.0, 40.0])]);
        let chart = ChartConfig::new("c", "", ColumnRef::new("t", "x"))
            .with_kind(kind)
            .with_series(SeriesConfig::new("s", ColumnRef::new("p", "y")));
        (chart, [truth, pred].into_iter().collect())
    }

    #[test]
    fn general_chart_scans_x_refs_only() {
        let (chart, datasets) = chart_over(ChartKind::General);
        assert_eq!(
            compute_x_domain(&chart, &datasets),
            Domain::Range { min: -0.5, max: 10.5 }
        );
        let domains = compute_domains(&chart, &datasets);
        assert!(domains.left_y.is_auto());
        assert!(domains.right_y.is_auto());
    }

    #[test]
    fn series_x_overrides_join_the_scan() {
        let (mut chart, datasets) = chart_over(ChartKind::General);
        chart
            .series
            .push(SeriesConfig::new("s2", ColumnRef::new("p", "y")).with_x(ColumnRef::new("t", "alt")));
        assert_eq!(
            compute_x_domain(&chart, &datasets),
            Domain::Range { min: -11.0, max: 11.0 }
        );
    }

    #[test]
    fn diagonal_chart_folds_y_and_shares_domain() {
        let (chart, datasets) = chart_over(ChartKind::Diagonal);
        let domains = compute_domains(&chart, &datasets);
        assert_eq!(domains.x, Domain::Range { min: -2.0, max: 42.0 });
        assert_eq!(domains.left_y, domains.x);
    }

    #[test]
    fn refs_are_deduplicated() {
        let (mut chart, _) = chart_over(ChartKind::Diagonal);
        chart.series.push(
            SeriesConfig::new("dup", ColumnRef::new("p", "y")).with_x(ColumnRef::new("t", "x")),
        );
        assert_eq!(domain_refs(&chart).len(), 2);
    }

    #[test]
    fn dangling_refs_give_auto() {
        let chart = ChartConfig::new("c", "", ColumnRef::new("gone", "x"));
        assert_eq!(compute_x_domain(&chart, &DatasetCollection::new()), Domain::Auto);
    }
}
