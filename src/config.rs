use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Configuration for a batch analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum daily rows before a multi-week window is computed.
    pub min_days: usize,
    pub batch_size: usize,
    /// Concurrent fetch+compute tasks within a batch.
    pub fetch_concurrency: usize,
    pub cache_path: PathBuf,
    pub cache_expiry_hours: i64,
    pub output_dir: PathBuf,
}

impl AnalyzerConfig {
    pub fn from_env() -> Result<Self> {
        let min_days = env::var("MIN_DAYS_REQUIRED")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()
            .context("Failed to parse MIN_DAYS_REQUIRED")?;

        let batch_size = env::var("BATCH_SIZE")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<usize>()
            .context("Failed to parse BATCH_SIZE")?;
        if batch_size == 0 {
            anyhow::bail!("BATCH_SIZE must be at least 1");
        }

        let fetch_concurrency = env::var("FETCH_CONCURRENCY")
            .unwrap_or_else(|_| "16".to_string())
            .parse::<usize>()
            .context("Failed to parse FETCH_CONCURRENCY")?;
        if fetch_concurrency == 0 {
            anyhow::bail!("FETCH_CONCURRENCY must be at least 1");
        }

        let cache_path = PathBuf::from(
            env::var("CACHE_FILE").unwrap_or_else(|_| "intraday_cache.json".to_string()),
        );

        let cache_expiry_hours = env::var("CACHE_EXPIRY_HOURS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<i64>()
            .context("Failed to parse CACHE_EXPIRY_HOURS")?;

        let output_dir =
            PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()));

        Ok(Self {
            min_days,
            batch_size,
            fetch_concurrency,
            cache_path,
            cache_expiry_hours,
            output_dir,
        })
    }
}

/// Configuration for the live volatility scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub scan_interval_secs: u64,
    /// Alert when |Z| strictly exceeds this value.
    pub zscore_threshold: f64,
    pub cooldown_hours: i64,
    /// Tickers dispatched concurrently per cycle chunk.
    pub batch_size: usize,
    pub min_bars: usize,
    /// Trailing window for the Z-score baseline, in trading days.
    pub volatility_window_days: usize,
}

impl ScannerConfig {
    pub fn from_env() -> Result<Self> {
        let scan_interval_secs = env::var("SCAN_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .context("Failed to parse SCAN_INTERVAL_SECS")?;

        let zscore_threshold = env::var("ZSCORE_THRESHOLD")
            .unwrap_or_else(|_| "2.0".to_string())
            .parse::<f64>()
            .context("Failed to parse ZSCORE_THRESHOLD")?;
        if !zscore_threshold.is_finite() || zscore_threshold <= 0.0 {
            anyhow::bail!("ZSCORE_THRESHOLD must be a positive number");
        }

        let cooldown_hours = env::var("ALERT_COOLDOWN_HOURS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<i64>()
            .context("Failed to parse ALERT_COOLDOWN_HOURS")?;

        let batch_size = env::var("SCAN_BATCH_SIZE")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<usize>()
            .context("Failed to parse SCAN_BATCH_SIZE")?;
        if batch_size == 0 {
            anyhow::bail!("SCAN_BATCH_SIZE must be at least 1");
        }

        let min_bars = env::var("MIN_BARS_REQUIRED")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<usize>()
            .context("Failed to parse MIN_BARS_REQUIRED")?;

        let volatility_window_days = env::var("VOLATILITY_WINDOW_DAYS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<usize>()
            .context("Failed to parse VOLATILITY_WINDOW_DAYS")?;

        Ok(Self {
            scan_interval_secs,
            zscore_threshold,
            cooldown_hours,
            batch_size,
            min_bars,
            volatility_window_days,
        })
    }
}
