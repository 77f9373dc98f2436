//! fitplot_core
//!
//! Series resolution and goodness-of-fit statistics for charts whose columns
//! come from several independently loaded datasets.
//!
//! Everything here is a pure function of `(datasets, chart config)`:
//! - [`resolve`](resolve::resolve) turns a `(dataset, column)` reference into numbers
//! - [`series::build`] pairs x/y by row index, drops non-finite pairs, sorts by x
//! - [`domain::compute_x_domain`] finds the shared, padded x domain
//! - [`metrics::compute`] reports MAE, RMSE and R² for truth vs. prediction
//! - [`build_chart`] composes the above into a [`ChartView`]
//!
//! Nothing in the computation path fails: missing datasets, text cells and
//! empty inputs all degrade to empty results.

mod cache;
mod error;

pub mod chart;
pub mod color;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod format;
pub mod metrics;
pub mod resolve;
pub mod series;

pub use cache::{CacheStats, ChartCache};
pub use chart::{build_chart, ChartView, SeriesView};
pub use color::{next_color, PALETTE};
pub use config::{Axis, ChartConfig, ChartKind, ColumnRef, RenderKind, SeriesConfig};
pub use dataset::{CellValue, Dataset, DatasetCollection, DatasetId, Row};
pub use domain::{ChartDomains, Domain};
pub use error::CollectionError;
pub use format::format_value;
pub use metrics::ResolvedMetrics;
pub use resolve::ResolvedColumn;
pub use series::DataPoint;

/// Common imports for hosts.
pub mod prelude {
    pub use crate::cache::ChartCache;
    pub use crate::chart::{build_chart, ChartView, SeriesView};
    pub use crate::color::next_color;
    pub use crate::config::{Axis, ChartConfig, ChartKind, ColumnRef, RenderKind, SeriesConfig};
    pub use crate::dataset::{CellValue, Dataset, DatasetCollection, DatasetId, Row};
    pub use crate::domain::Domain;
    pub use crate::format::format_value;
    pub use crate::metrics::ResolvedMetrics;
}
