//! Goodness-of-fit between a truth column and a prediction column.
//!
//! R² is reported as exactly `0` when the truth values have zero variance,
//! where it would otherwise be undefined. Downstream tables rely on a finite
//! number here.

use serde::Serialize;

/// Accuracy of one series against its truth column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedMetrics {
    pub series_label: String,
    pub truth_label: String,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    /// Number of index-aligned pairs where both values were finite.
    pub n: usize,
}

/// Compute MAE, RMSE and R² over the index-aligned finite pairs of
/// `truth` and `pred`.
///
/// Returns `None` when either input is empty or no finite pair remains.
pub fn compute(
    truth: &[f64],
    pred: &[f64],
    series_label: &str,
    truth_label: &str,
) -> Option<ResolvedMetrics> {
    if truth.is_empty() || pred.is_empty() {
        return None;
    }

    let valid = || {
        truth
            .iter()
            .zip(pred)
            .map(|(&t, &p)| (t, p))
            .filter(|(t, p)| t.is_finite() && p.is_finite())
    };

    let mut n = 0usize;
    let mut abs_sum = 0.0;
    let mut ss_res = 0.0;
    let mut truth_sum = 0.0;
    for (t, p) in valid() {
        let err = t - p;
        n += 1;
        abs_sum += err.abs();
        ss_res += err * err;
        truth_sum += t;
    }
    if n == 0 {
        return None;
    }

    let count = n as f64;
    let mean_truth = truth_sum / count;
    let ss_tot: f64 = valid()
        .map(|(t, _)| {
            let d = t - mean_truth;
            d * d
        })
        .sum();
    let r2 = if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Some(ResolvedMetrics {
        series_label: series_label.to_string(),
        truth_label: truth_label.to_string(),
        mae: abs_sum / count,
        rmse: (ss_res / count).sqrt(),
        r2,
        n,
    })
}
