use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV observation for a symbol at a point in time.
///
/// Sequences of bars are ordered by strictly increasing timestamp with no
/// duplicates; providers are responsible for enforcing this on ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Intraday range (high - low) / open, in percent.
    ///
    /// None when the open is non-positive or the result is not finite.
    pub fn intraday_range_pct(&self) -> Option<f64> {
        if self.open <= 0.0 {
            return None;
        }
        let range = (self.high - self.low) / self.open * 100.0;
        range.is_finite().then_some(range)
    }
}

/// A price history reduced to one bar per trading day.
///
/// Derived from raw bars on every run, never persisted. Construction drops
/// days whose intraday range is undefined (non-positive or missing open), so
/// every retained bar has a valid range.
#[derive(Debug, Clone, Default)]
pub struct DailySeries {
    bars: Vec<PriceBar>,
}

impl DailySeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        let bars = bars
            .into_iter()
            .filter(|b| b.intraday_range_pct().is_some())
            .collect();
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// Range values for the trailing `days` rows (all rows when shorter).
    pub fn tail_ranges(&self, days: usize) -> Vec<f64> {
        let start = self.bars.len().saturating_sub(days);
        self.bars[start..]
            .iter()
            .filter_map(PriceBar::intraday_range_pct)
            .collect()
    }

    /// Log returns ln(close_t / close_{t-1}) attached to the trailing `days`
    /// rows. The return of a window's first row still uses the preceding
    /// day's close, so a window of n rows carries up to n returns. Rows with
    /// non-positive closes on either side contribute no value.
    pub fn tail_log_returns(&self, days: usize) -> Vec<f64> {
        let start = self.bars.len().saturating_sub(days);
        (start..self.bars.len())
            .filter_map(|i| {
                if i == 0 {
                    return None;
                }
                let prev = self.bars[i - 1].close;
                let curr = self.bars[i].close;
                if prev > 0.0 && curr > 0.0 {
                    let ret = (curr / prev).ln();
                    ret.is_finite().then_some(ret)
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, open: f64, high: f64, low: f64, close: f64) -> PriceBar {
        PriceBar {
            timestamp: Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn test_intraday_range_pct() {
        let b = bar(3, 100.0, 102.0, 99.0, 101.0);
        assert!((b.intraday_range_pct().unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_open_row_is_dropped() {
        let series = DailySeries::new(vec![
            bar(3, 100.0, 101.0, 99.0, 100.0),
            bar(4, 0.0, 101.0, 99.0, 100.0),
            bar(5, 100.0, 103.0, 100.0, 102.0),
        ]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_tail_log_returns_reach_before_window() {
        let series = DailySeries::new(vec![
            bar(3, 100.0, 101.0, 99.0, 100.0),
            bar(4, 100.0, 101.0, 99.0, 110.0),
            bar(5, 110.0, 112.0, 109.0, 121.0),
        ]);

        // A one-day window still has one return: today's close vs yesterday's.
        let rets = series.tail_log_returns(1);
        assert_eq!(rets.len(), 1);
        assert!((rets[0] - (121.0f64 / 110.0).ln()).abs() < 1e-12);

        // The very first row of the whole series has no return.
        let rets = series.tail_log_returns(3);
        assert_eq!(rets.len(), 2);
    }
}
