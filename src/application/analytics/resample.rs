//! Resampling of raw price bars into one bar per trading day.

use crate::domain::market::{DailySeries, PriceBar};
use chrono::NaiveDate;

/// Median bar spacing below this many seconds means the series is intraday
/// and needs daily resampling; at or above it the series is used as-is.
const INTRADAY_GAP_SECS: f64 = 3600.0;

/// Collapse a bar history into a daily series.
///
/// Intraday input (median timestamp gap under one hour) is aggregated per
/// calendar day: open = first, high = max, low = min, close = last,
/// volume = sum. Daily-or-coarser input passes through unchanged.
pub fn resample_to_daily(bars: &[PriceBar]) -> DailySeries {
    if bars.len() < 2 || !is_intraday(bars) {
        return DailySeries::new(bars.to_vec());
    }

    let mut daily: Vec<PriceBar> = Vec::new();
    let mut current: Option<(NaiveDate, PriceBar)> = None;

    for bar in bars {
        let date = bar.timestamp.date_naive();
        match &mut current {
            Some((open_date, building)) if *open_date == date => {
                building.high = building.high.max(bar.high);
                building.low = building.low.min(bar.low);
                building.close = bar.close;
                building.volume += bar.volume;
            }
            Some((_, building)) => {
                daily.push(building.clone());
                current = Some((date, bar.clone()));
            }
            None => {
                current = Some((date, bar.clone()));
            }
        }
    }

    if let Some((_, building)) = current {
        daily.push(building);
    }

    DailySeries::new(daily)
}

fn is_intraday(bars: &[PriceBar]) -> bool {
    median_gap_secs(bars).is_some_and(|gap| gap < INTRADAY_GAP_SECS)
}

/// Median spacing between consecutive timestamps, in seconds.
fn median_gap_secs(bars: &[PriceBar]) -> Option<f64> {
    if bars.len() < 2 {
        return None;
    }

    let mut gaps: Vec<f64> = bars
        .windows(2)
        .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_seconds() as f64)
        .collect();
    gaps.sort_by(f64::total_cmp);

    let mid = gaps.len() / 2;
    if gaps.len() % 2 == 0 {
        Some((gaps[mid - 1] + gaps[mid]) / 2.0)
    } else {
        Some(gaps[mid])
    }
}
