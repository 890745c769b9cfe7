use crate::domain::market::window::AnalysisWindow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Volatility metrics for one (ticker, window) pair.
///
/// Immutable once computed. Every float field is sanitized by the engine:
/// degenerate windows (zero variance, single rows) produce 0.0, never
/// NaN or infinity, so records are always safe to sort and serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub avg_intraday_range: f64,
    pub std_intraday_range: f64,
    pub median_intraday_range: f64,
    pub min_intraday_range: f64,
    pub max_intraday_range: f64,
    pub range_spread: f64,
    /// Annualized realized volatility of daily log returns, in percent.
    pub realized_volatility: f64,
    /// Mean range over its standard deviation; higher = more predictable.
    pub consistency_score: f64,
    pub swing_2pct_days: u32,
    pub swing_3pct_days: u32,
    /// Days whose range exceeded the window mean by more than 2 std devs.
    pub extreme_move_days: u32,
    /// Days whose range exceeded the window mean by more than 3 std devs.
    pub ultra_extreme_move_days: u32,
    pub range_p25: f64,
    pub range_p50: f64,
    pub range_p75: f64,
    pub range_p90: f64,
    pub range_p95: f64,
    pub range_p99: f64,
    pub days_in_window: u32,
}

impl WindowStats {
    /// Column names for tabular export, in declaration order.
    pub const CSV_FIELDS: [&'static str; 19] = [
        "avg_intraday_range",
        "std_intraday_range",
        "median_intraday_range",
        "min_intraday_range",
        "max_intraday_range",
        "range_spread",
        "realized_volatility",
        "consistency_score",
        "swing_2pct_days",
        "swing_3pct_days",
        "extreme_move_days",
        "ultra_extreme_move_days",
        "range_p25",
        "range_p50",
        "range_p75",
        "range_p90",
        "range_p95",
        "range_p99",
        "days_in_window",
    ];

    /// Values matching `CSV_FIELDS`, stringified for a CSV record.
    pub fn csv_record(&self) -> Vec<String> {
        vec![
            self.avg_intraday_range.to_string(),
            self.std_intraday_range.to_string(),
            self.median_intraday_range.to_string(),
            self.min_intraday_range.to_string(),
            self.max_intraday_range.to_string(),
            self.range_spread.to_string(),
            self.realized_volatility.to_string(),
            self.consistency_score.to_string(),
            self.swing_2pct_days.to_string(),
            self.swing_3pct_days.to_string(),
            self.extreme_move_days.to_string(),
            self.ultra_extreme_move_days.to_string(),
            self.range_p25.to_string(),
            self.range_p50.to_string(),
            self.range_p75.to_string(),
            self.range_p90.to_string(),
            self.range_p95.to_string(),
            self.range_p99.to_string(),
            self.days_in_window.to_string(),
        ]
    }

    /// Percentile ladder in ascending order, for invariant checks.
    pub fn percentile_ladder(&self) -> [f64; 6] {
        [
            self.range_p25,
            self.range_p50,
            self.range_p75,
            self.range_p90,
            self.range_p95,
            self.range_p99,
        ]
    }
}

/// Per-window stats for one ticker across the standard window ladder.
///
/// A window key is absent (not zero-filled) when the ticker lacks the
/// window's minimum history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerStats {
    pub ticker: String,
    pub total_days: u32,
    pub windows: BTreeMap<AnalysisWindow, WindowStats>,
}

impl TickerStats {
    pub fn window(&self, window: AnalysisWindow) -> Option<&WindowStats> {
        self.windows.get(&window)
    }

    pub fn has_window(&self, window: AnalysisWindow) -> bool {
        self.windows.contains_key(&window)
    }
}
