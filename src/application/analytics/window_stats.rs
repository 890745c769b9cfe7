//! The window statistics engine.
//!
//! Turns a daily series into per-window volatility metrics: intraday range
//! distribution, realized volatility, consistency, swing-day and
//! extreme-move-day counts. Windows with insufficient history are absent
//! rather than zero-filled, and every emitted float is finite.

use crate::application::analytics::descriptive::{
    mean, percentile, sample_std, sanitize, sorted_copy,
};
use crate::domain::market::{AnalysisWindow, DailySeries, TickerStats, WindowStats};
use std::collections::BTreeMap;

/// Range thresholds (percent) that qualify a day as a swing day.
pub const SWING_THRESHOLDS: [f64; 2] = [2.0, 3.0];

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Compute metrics for the trailing `window` of `series`.
///
/// Returns None when the series is shorter than the window's minimum-days
/// requirement (raised to `min_days` for windows that nominally cover at
/// least that many rows) — the legitimate "insufficient history" state.
pub fn compute_window(
    series: &DailySeries,
    window: AnalysisWindow,
    min_days: usize,
) -> Option<WindowStats> {
    let mut required = window.min_days();
    if window.slice_days() >= min_days {
        required = required.max(min_days);
    }
    if series.len() < required {
        return None;
    }

    let ranges = series.tail_ranges(window.slice_days());
    if ranges.is_empty() {
        return None;
    }
    let log_returns = series.tail_log_returns(window.slice_days());

    Some(compute_from_values(&ranges, &log_returns))
}

/// Assemble stats for one ticker across the standard window ladder.
///
/// None when no window at all can be computed (no valid daily rows).
pub fn compute_ticker_stats(
    ticker: &str,
    series: &DailySeries,
    min_days: usize,
) -> Option<TickerStats> {
    if series.is_empty() {
        return None;
    }

    let windows: BTreeMap<AnalysisWindow, WindowStats> = AnalysisWindow::ALL
        .into_iter()
        .filter_map(|w| compute_window(series, w, min_days).map(|stats| (w, stats)))
        .collect();

    if windows.is_empty() {
        return None;
    }

    Some(TickerStats {
        ticker: ticker.to_string(),
        total_days: series.len() as u32,
        windows,
    })
}

fn compute_from_values(ranges: &[f64], log_returns: &[f64]) -> WindowStats {
    let avg = mean(ranges);
    let std = sample_std(ranges);

    let sorted = sorted_copy(ranges);
    let min = sorted.first().copied().unwrap_or(0.0);
    let max = sorted.last().copied().unwrap_or(0.0);

    // Annualized realized volatility from daily log returns. Degenerate
    // inputs (fewer than two returns, zero dispersion) collapse to 0.
    let realized_volatility = if log_returns.len() < 2 {
        0.0
    } else {
        sanitize(sample_std(log_returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
    };

    let consistency_score = if std > 0.0 { sanitize(avg / std) } else { 0.0 };

    let swing_2pct_days = count_above(ranges, SWING_THRESHOLDS[0]);
    let swing_3pct_days = count_above(ranges, SWING_THRESHOLDS[1]);

    // Extreme days are defined against the window's own distribution, so a
    // zero-variance window by definition has none.
    let (extreme_move_days, ultra_extreme_move_days) = if std > 0.0 {
        (
            count_above(ranges, avg + 2.0 * std),
            count_above(ranges, avg + 3.0 * std),
        )
    } else {
        (0, 0)
    };

    WindowStats {
        avg_intraday_range: sanitize(avg),
        std_intraday_range: sanitize(std),
        median_intraday_range: percentile(&sorted, 50.0),
        min_intraday_range: sanitize(min),
        max_intraday_range: sanitize(max),
        range_spread: sanitize(max - min),
        realized_volatility,
        consistency_score,
        swing_2pct_days,
        swing_3pct_days,
        extreme_move_days,
        ultra_extreme_move_days,
        range_p25: percentile(&sorted, 25.0),
        range_p50: percentile(&sorted, 50.0),
        range_p75: percentile(&sorted, 75.0),
        range_p90: percentile(&sorted, 90.0),
        range_p95: percentile(&sorted, 95.0),
        range_p99: percentile(&sorted, 99.0),
        days_in_window: ranges.len() as u32,
    }
}

fn count_above(values: &[f64], threshold: f64) -> u32 {
    values.iter().filter(|v| **v > threshold).count() as u32
}
