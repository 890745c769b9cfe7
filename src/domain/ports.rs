use crate::domain::errors::MarketDataError;
use crate::domain::market::{Alert, PriceBar};
use anyhow::Result;
use async_trait::async_trait;

/// Bar granularity requested from a market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarInterval {
    FiveMinute,
    Daily,
}

impl BarInterval {
    pub fn as_query(&self) -> &'static str {
        match self {
            BarInterval::FiveMinute => "5m",
            BarInterval::Daily => "1d",
        }
    }
}

/// Lookback period requested from a market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRange {
    Days(u32),
    Months(u32),
    Years(u32),
}

impl FetchRange {
    pub fn as_query(&self) -> String {
        match self {
            FetchRange::Days(n) => format!("{}d", n),
            FetchRange::Months(n) => format!("{}mo", n),
            FetchRange::Years(n) => format!("{}y", n),
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch OHLCV history for one symbol.
    ///
    /// `Ok(vec![])` means the provider answered but has no data for the
    /// request; callers treat that as a definitive absence, not a failure.
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: BarInterval,
        range: FetchRange,
    ) -> Result<Vec<PriceBar>, MarketDataError>;
}

#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn deliver(&self, alert: &Alert) -> Result<()>;
}
