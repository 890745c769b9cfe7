//! Z-score of the most recent return against a trailing baseline.
//!
//! Used by the live scanner: a large |Z| on the latest bar means the move
//! is an outlier relative to the ticker's own recent return distribution.

use crate::application::analytics::descriptive::sample_std;
use statrs::statistics::{Data, Distribution};

/// Approximate number of 5-minute bars in one US equity trading day.
const BARS_PER_TRADING_DAY: usize = 78;

/// Hard floor on baseline size, independent of configuration.
const MIN_BASELINE_RETURNS: usize = 50;

#[derive(Debug, Clone)]
pub struct ZScoreConfig {
    /// Trailing window for the baseline, in trading days.
    pub window_days: usize,
    /// Minimum bars (and returns) required for a reading.
    pub min_bars: usize,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self {
            window_days: 20,
            min_bars: 100,
        }
    }
}

/// One standardized reading of the latest return.
#[derive(Debug, Clone)]
pub struct ZScoreReading {
    pub zscore: f64,
    /// Signed close-over-close move of the latest bar, in percent.
    pub percent_move: f64,
    pub mean_return: f64,
    pub std_return: f64,
    pub current_price: f64,
    pub bars_used: usize,
}

/// Standardize a value against a baseline mean and standard deviation.
pub fn standardize(current: f64, mean: f64, std: f64) -> f64 {
    (current - mean) / std
}

/// Compute the latest-bar Z-score from a close series.
///
/// None when history is too short or the baseline is degenerate (zero or
/// non-finite dispersion) — a reading that cannot be trusted is no reading.
pub fn compute_zscore(closes: &[f64], config: &ZScoreConfig) -> Option<ZScoreReading> {
    if closes.len() < config.min_bars {
        return None;
    }

    let log_returns: Vec<f64> = closes
        .windows(2)
        .filter_map(|pair| {
            if pair[0] > 0.0 && pair[1] > 0.0 {
                let ret = (pair[1] / pair[0]).ln();
                ret.is_finite().then_some(ret)
            } else {
                None
            }
        })
        .collect();

    if log_returns.len() < config.min_bars {
        return None;
    }

    let window = log_returns
        .len()
        .min(config.window_days * BARS_PER_TRADING_DAY);
    if window < MIN_BASELINE_RETURNS {
        return None;
    }

    let recent = &log_returns[log_returns.len() - window..];
    let data = Data::new(recent.to_vec());
    let mean_return = data.mean().unwrap_or(f64::NAN);
    let std_return = sample_std(recent);

    if std_return == 0.0 || !mean_return.is_finite() {
        return None;
    }

    let current_return = *log_returns.last()?;
    let zscore = standardize(current_return, mean_return, std_return);
    if !zscore.is_finite() {
        return None;
    }

    let current_price = *closes.last()?;
    let previous_price = closes[closes.len() - 2];
    let percent_move = if previous_price > 0.0 {
        (current_price - previous_price) / previous_price * 100.0
    } else {
        0.0
    };

    Some(ZScoreReading {
        zscore,
        percent_move,
        mean_return,
        std_return,
        current_price,
        bars_used: window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_exact_two_sigma() {
        // mean + 2*std must standardize to exactly 2.0 when the arithmetic
        // is representable, pinning the alert-boundary semantics.
        let mean = 0.001;
        let std = 0.0005;
        assert_eq!(standardize(mean + 2.0 * std, mean, std), 2.0);
    }

    #[test]
    fn test_insufficient_bars_yields_none() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.01).collect();
        let config = ZScoreConfig::default();
        assert!(compute_zscore(&closes, &config).is_none());
    }

    #[test]
    fn test_constant_closes_yield_none() {
        let closes = vec![100.0; 200];
        let config = ZScoreConfig::default();
        // All returns are zero: the baseline has no dispersion.
        assert!(compute_zscore(&closes, &config).is_none());
    }

    #[test]
    fn test_outlier_final_bar_scores_high() {
        // Small alternating noise, then a 5% jump on the final bar.
        let mut closes = Vec::with_capacity(202);
        let mut price = 100.0;
        closes.push(price);
        for i in 0..200 {
            price *= if i % 2 == 0 { 1.001 } else { 0.999 };
            closes.push(price);
        }
        price *= 1.05;
        closes.push(price);

        let config = ZScoreConfig::default();
        let reading = compute_zscore(&closes, &config).unwrap();

        assert!(reading.zscore > 2.0, "zscore = {}", reading.zscore);
        assert!((reading.percent_move - 5.0).abs() < 0.01);
        assert_eq!(reading.current_price, price);
    }

    #[test]
    fn test_percent_move_sign() {
        let mut closes = Vec::with_capacity(202);
        let mut price = 100.0;
        closes.push(price);
        for i in 0..200 {
            price *= if i % 2 == 0 { 1.001 } else { 0.999 };
            closes.push(price);
        }
        price *= 0.94;
        closes.push(price);

        let reading = compute_zscore(&closes, &ZScoreConfig::default()).unwrap();
        assert!(reading.zscore < -2.0);
        assert!(reading.percent_move < 0.0);
    }
}
