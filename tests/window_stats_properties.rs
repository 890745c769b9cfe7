//! End-to-end properties of the window statistics engine.

use chrono::{Duration, TimeZone, Utc};
use swingscan::application::analytics::window_stats::{compute_ticker_stats, compute_window};
use swingscan::domain::market::{AnalysisWindow, DailySeries, PriceBar};

const MIN_DAYS: usize = 5;

/// Daily bars whose intraday range (percent of the 100.0 open) follows the
/// given sequence, with mildly drifting closes.
fn series_with_ranges(ranges: &[f64]) -> DailySeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let bars: Vec<PriceBar> = ranges
        .iter()
        .enumerate()
        .map(|(i, pct)| PriceBar {
            timestamp: start + Duration::days(i as i64),
            open: 100.0,
            high: 100.0 + pct,
            low: 100.0,
            close: 100.0 + (i % 5) as f64 * 0.2,
            volume: 10_000.0,
        })
        .collect();
    DailySeries::new(bars)
}

/// Deterministic ranges evenly covering [0.5, 1.5).
fn uniform_ranges(n: usize) -> Vec<f64> {
    (0..n).map(|i| 0.5 + ((i * 37) % 100) as f64 / 100.0).collect()
}

#[test]
fn below_minimum_series_yields_absence_not_zeros() {
    for n in 0..MIN_DAYS {
        let series = series_with_ranges(&vec![1.0; n]);
        assert!(
            compute_window(&series, AnalysisWindow::Last7Days, MIN_DAYS).is_none(),
            "{} rows must not produce a 7-day window",
            n
        );
        assert!(compute_window(&series, AnalysisWindow::Last30Days, MIN_DAYS).is_none());
        assert!(compute_window(&series, AnalysisWindow::LastYear, MIN_DAYS).is_none());
    }
}

#[test]
fn three_valid_rows_populate_only_short_windows() {
    let series = series_with_ranges(&[1.2, 0.8, 2.4]);
    let stats = compute_ticker_stats("NEWLY", &series, MIN_DAYS).unwrap();

    assert!(stats.has_window(AnalysisWindow::Today));
    assert!(stats.has_window(AnalysisWindow::Last3Days));
    for window in [
        AnalysisWindow::Last7Days,
        AnalysisWindow::Last30Days,
        AnalysisWindow::Last3Months,
        AnalysisWindow::LastYear,
    ] {
        assert!(!stats.has_window(window), "{} should be absent", window);
    }
}

#[test]
fn constant_ranges_degenerate_cleanly() {
    let series = series_with_ranges(&[1.7; 40]);
    let stats = compute_ticker_stats("FLAT", &series, MIN_DAYS).unwrap();

    for (window, ws) in &stats.windows {
        assert_eq!(ws.consistency_score, 0.0, "{}", window);
        assert_eq!(ws.extreme_move_days, 0, "{}", window);
        assert_eq!(ws.ultra_extreme_move_days, 0, "{}", window);
        assert_eq!(ws.std_intraday_range, 0.0, "{}", window);
        assert!(ws.avg_intraday_range.is_finite());
        assert!(ws.realized_volatility.is_finite());
    }
}

#[test]
fn percentile_ladder_is_monotone_for_any_window() {
    let ranges: Vec<f64> = (0..120)
        .map(|i| 0.2 + ((i * 53) % 311) as f64 / 100.0)
        .collect();
    let series = series_with_ranges(&ranges);
    let stats = compute_ticker_stats("MIXED", &series, MIN_DAYS).unwrap();

    for (window, ws) in &stats.windows {
        let ladder = ws.percentile_ladder();
        for pair in ladder.windows(2) {
            assert!(
                pair[0] <= pair[1],
                "{}: ladder not monotone: {:?}",
                window,
                ladder
            );
        }
        assert!(ws.min_intraday_range <= ladder[0]);
        assert!(ladder[5] <= ws.max_intraday_range);
    }
}

#[test]
fn one_year_of_uniform_ranges_matches_distribution() {
    let series = series_with_ranges(&uniform_ranges(252));
    let stats = compute_ticker_stats("UNIF", &series, MIN_DAYS).unwrap();

    let year = stats.window(AnalysisWindow::LastYear).expect("window present");
    assert_eq!(year.days_in_window, 252);

    // Uniform on [0.5, 1.5): mean about 1.0.
    assert!(
        (year.avg_intraday_range - 1.0).abs() < 0.1,
        "avg = {}",
        year.avg_intraday_range
    );

    // Nothing reaches the 2% swing threshold.
    assert_eq!(year.swing_2pct_days, 0);
    assert_eq!(year.swing_3pct_days, 0);

    // A uniform distribution tops out around mean + 1.73 sigma, so no day
    // can clear the mean + 2 sigma bar.
    assert_eq!(year.extreme_move_days, 0);
    assert_eq!(year.ultra_extreme_move_days, 0);
}

#[test]
fn rows_without_valid_open_are_invisible() {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let bars: Vec<PriceBar> = (0..10)
        .map(|i| PriceBar {
            timestamp: start + Duration::days(i),
            open: if i % 2 == 0 { 100.0 } else { 0.0 },
            high: 102.0,
            low: 99.0,
            close: 100.5,
            volume: 1.0,
        })
        .collect();
    let series = DailySeries::new(bars);

    // Half of the rows are dropped, leaving 5 valid days.
    assert_eq!(series.len(), 5);
    let stats = compute_ticker_stats("SPOTTY", &series, MIN_DAYS).unwrap();
    assert!(stats.has_window(AnalysisWindow::Last3Days));
    assert!(!stats.has_window(AnalysisWindow::Last7Days));
}

#[test]
fn all_zero_rows_yield_no_stats_at_all() {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let bars: Vec<PriceBar> = (0..10)
        .map(|i| PriceBar {
            timestamp: start + Duration::days(i),
            open: 0.0,
            high: 1.0,
            low: 0.5,
            close: 0.8,
            volume: 1.0,
        })
        .collect();

    let series = DailySeries::new(bars);
    assert!(series.is_empty());
    assert!(compute_ticker_stats("DEAD", &series, MIN_DAYS).is_none());
}
