//! Descriptive statistics over range and return series.
//!
//! All helpers operate at the f64 boundary and sanitize their results:
//! downstream sorting and serialization must never see NaN or infinity.

use statrs::statistics::{Data, Distribution};

/// Coerce NaN / infinite values to 0.0.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let data = Data::new(values.to_vec());
    sanitize(data.mean().unwrap_or(0.0))
}

/// Sample standard deviation (ddof = 1); 0.0 for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let data = Data::new(values.to_vec());
    sanitize(data.std_dev().unwrap_or(0.0))
}

/// Percentile by linear interpolation between closest ranks.
///
/// `sorted` must be in ascending order. Empty input yields 0.0.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sanitize(sorted[0]);
    }

    let rank = (pct / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sanitize(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Ascending copy of `values`; inputs are expected to be finite already.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
