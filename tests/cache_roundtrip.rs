//! Persistence-format round-trip guarantees for the stats cache.

use chrono::{Duration, TimeZone, Utc};
use std::fs;
use std::path::PathBuf;
use swingscan::application::analytics::window_stats::compute_ticker_stats;
use swingscan::domain::market::{DailySeries, PriceBar};
use swingscan::infrastructure::cache::StatsCache;

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "swingscan_it_cache_{}_{}.json",
        tag,
        std::process::id()
    ))
}

/// Real engine output, including degenerate windows, for round-trip fidelity.
fn engine_stats(ticker: &str, days: usize) -> swingscan::domain::market::TickerStats {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let bars: Vec<PriceBar> = (0..days)
        .map(|i| PriceBar {
            timestamp: start + Duration::days(i as i64),
            open: 50.0 + (i % 7) as f64,
            high: 52.0 + (i % 7) as f64 + (i % 3) as f64 * 0.4,
            low: 49.5 + (i % 7) as f64,
            close: 51.0 + (i % 11) as f64 * 0.3,
            volume: 5_000.0,
        })
        .collect();
    compute_ticker_stats(ticker, &DailySeries::new(bars), 5).unwrap()
}

#[tokio::test]
async fn roundtrip_preserves_every_numeric_field() {
    let path = temp_path("fidelity");
    let original = engine_stats("TQQQ", 300);

    let cache = StatsCache::load(path.clone(), 24);
    cache.put("TQQQ", original.clone()).await;
    cache.flush().await.unwrap();

    let reloaded = StatsCache::load(path.clone(), 24);
    let restored = reloaded.get("TQQQ").await.expect("entry survives reload");

    assert_eq!(restored.ticker, original.ticker);
    assert_eq!(restored.total_days, original.total_days);
    assert_eq!(restored.windows.len(), original.windows.len());

    for (window, before) in &original.windows {
        let after = restored.windows.get(window).expect("window key survives");
        assert_eq!(after, before, "window {} changed across the round-trip", window);
        for value in after.percentile_ladder() {
            assert!(value.is_finite());
        }
    }

    let _ = fs::remove_file(path);
}

#[tokio::test]
async fn serialized_form_contains_no_non_finite_values() {
    let path = temp_path("no_nan");
    let cache = StatsCache::load(path.clone(), 24);
    cache.put("FLAT", engine_stats("FLAT", 10)).await;
    cache.flush().await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("NaN"));
    assert!(!content.contains("null"));
    assert!(!content.contains("inf"));

    // Timestamps persist as ISO-8601 strings.
    assert!(content.contains("\"timestamp\""));
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    let ts = parsed["FLAT"]["timestamp"].as_str().unwrap();
    assert!(ts.contains('T'));

    let _ = fs::remove_file(path);
}

#[tokio::test]
async fn corrupt_cache_degrades_to_empty_not_fatal() {
    let path = temp_path("corrupt");
    fs::write(&path, "]]] definitely not json").unwrap();

    let cache = StatsCache::load(path.clone(), 24);
    assert!(cache.get("ANY").await.is_none());

    // The cache still accepts new entries and flushes over the bad file.
    cache.put("SPY", engine_stats("SPY", 40)).await;
    cache.flush().await.unwrap();

    let reloaded = StatsCache::load(path.clone(), 24);
    assert!(reloaded.get("SPY").await.is_some());

    let _ = fs::remove_file(path);
}

#[tokio::test]
async fn expired_entries_behave_as_misses() {
    let path = temp_path("expiry");
    let cache = StatsCache::load(path.clone(), 0);
    cache.put("SPY", engine_stats("SPY", 40)).await;

    // Zero-hour expiry means every entry is already stale.
    assert!(cache.get("SPY").await.is_none());

    let _ = fs::remove_file(path);
}
