use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::chart::{build_chart, ChartView};
use crate::config::ChartConfig;
use crate::dataset::{Dataset, DatasetCollection, DatasetId};

/// What a cached view was built from.
///
/// Datasets are compared by identity: they are immutable and replaced
/// wholesale, so a new `Arc` means new content.
#[derive(Clone, Debug)]
struct CacheKey {
    chart: ChartConfig,
    datasets: Vec<(DatasetId, Option<Arc<Dataset>>)>,
}

impl CacheKey {
    fn new(chart: &ChartConfig, datasets: &DatasetCollection) -> Self {
        let datasets = chart
            .referenced_datasets()
            .into_iter()
            .map(|id| (id.clone(), datasets.get(id).cloned()))
            .collect();
        Self {
            chart: chart.clone(),
            datasets,
        }
    }

    fn matches(&self, chart: &ChartConfig, datasets: &DatasetCollection) -> bool {
        if self.chart != *chart {
            return false;
        }
        let referenced = chart.referenced_datasets();
        referenced.len() == self.datasets.len()
            && referenced
                .into_iter()
                .zip(&self.datasets)
                .all(|(id, (cached_id, cached))| {
                    id == cached_id
                        && match (datasets.get(id), cached) {
                            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                            (None, None) => true,
                            _ => false,
                        }
                })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes [`build_chart`] per chart id.
///
/// Purely an optimization: a hit returns exactly what a rebuild would.
#[derive(Debug, Default)]
pub struct ChartCache {
    entries: FxHashMap<String, (CacheKey, Arc<ChartView>)>,
    stats: CacheStats,
}

impl ChartCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view for `chart`, rebuilt only if the chart or one of its
    /// datasets changed since the last call.
    pub fn view(&mut self, chart: &ChartConfig, datasets: &DatasetCollection) -> Arc<ChartView> {
        if let Some((key, view)) = self.entries.get(&chart.id) {
            if key.matches(chart, datasets) {
                self.stats.hits += 1;
                trace!("ChartCache: hit for `{}`", chart.id);
                return Arc::clone(view);
            }
        }

        self.stats.misses += 1;
        trace!("ChartCache: rebuilding `{}`", chart.id);
        let view = Arc::new(build_chart(chart, datasets));
        self.entries.insert(
            chart.id.clone(),
            (CacheKey::new(chart, datasets), Arc::clone(&view)),
        );
        view
    }

    pub fn invalidate(&mut self, chart_id: &str) {
        self.entries.remove(chart_id);
    }

    /// Forget charts that no longer exist.
    pub fn retain<'a>(&mut self, chart_ids: impl IntoIterator<Item = &'a str>) {
        let keep: rustc_hash::FxHashSet<&str> = chart_ids.into_iter().collect();
        self.entries.retain(|id, _| keep.contains(id.as_str()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnRef, SeriesConfig};
    use crate::dataset::test_util::numeric;

    fn setup() -> (ChartConfig, DatasetCollection) {
        let chart = ChartConfig::new("c", "", ColumnRef::new("a", "x"))
            .with_series(SeriesConfig::new("s", ColumnRef::new("a", "y")));
        let datasets = [
            numeric("a", &[("x", &[1.0, 2.0]), ("y", &[3.0, 4.0])]),
            numeric("other", &[("x", &[0.0])]),
        ]
        .into_iter()
        .collect();
        (chart, datasets)
    }

    #[test]
    fn unchanged_inputs_hit() {
        let (chart, datasets) = setup();
        let mut cache = ChartCache::new();
        let a = cache.view(&chart, &datasets);
        let b = cache.view(&chart, &datasets);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn config_edit_misses() {
        let (mut chart, datasets) = setup();
        let mut cache = ChartCache::new();
        let before = cache.view(&chart, &datasets);
        chart.title = "renamed".into();
        let after = cache.view(&chart, &datasets);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.title, "renamed");
    }

    #[test]
    fn replacing_a_referenced_dataset_misses() {
        let (chart, mut datasets) = setup();
        let mut cache = ChartCache::new();
        let before = cache.view(&chart, &datasets);
        datasets
            .replace(numeric("a", &[("x", &[1.0]), ("y", &[9.0])]))
            .unwrap();
        let after = cache.view(&chart, &datasets);
        assert_eq!(before.total_points(), 2);
        assert_eq!(after.total_points(), 1);
    }

    #[test]
    fn unrelated_dataset_changes_still_hit() {
        let (chart, mut datasets) = setup();
        let mut cache = ChartCache::new();
        let before = cache.view(&chart, &datasets);
        datasets.remove(&"other".into());
        let after = cache.view(&chart, &datasets);
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn removal_then_reload_rebuilds() {
        let (chart, mut datasets) = setup();
        let mut cache = ChartCache::new();
        cache.view(&chart, &datasets);
        let removed = datasets.remove(&"a".into()).unwrap();
        assert!(cache.view(&chart, &datasets).is_empty());
        datasets.insert((*removed).clone()).unwrap();
        assert_eq!(cache.view(&chart, &datasets).total_points(), 2);
        assert_eq!(cache.stats().misses, 3);
    }

    #[test]
    fn retain_drops_stale_charts() {
        let (chart, datasets) = setup();
        let mut cache = ChartCache::new();
        cache.view(&chart, &datasets);
        cache.retain(["c"]);
        assert_eq!(cache.len(), 1);
        cache.retain(Vec::<&str>::new());
        assert!(cache.is_empty());
    }
}
