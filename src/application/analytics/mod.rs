// Volatility analytics
pub mod descriptive;
pub mod resample;
pub mod window_stats;
pub mod zscore;
