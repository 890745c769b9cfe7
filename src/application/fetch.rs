//! History fetch with an ordered granularity fallback.
//!
//! Fine-grained bars give the range computation real intraday extremes, but
//! providers cap how far back they serve them. Each strategy is tried in
//! sequence and returns a definitive result; provider errors are demoted to
//! absence so one ticker can never abort a batch.

use crate::domain::ports::{BarInterval, FetchRange, MarketDataProvider};
use crate::domain::market::PriceBar;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct FetchStrategy {
    pub interval: BarInterval,
    pub range: FetchRange,
}

pub struct HistoryFetcher {
    provider: Arc<dyn MarketDataProvider>,
    strategies: Vec<FetchStrategy>,
}

impl HistoryFetcher {
    /// Default plan: 5-minute bars over the intraday-capped 60 days, then
    /// daily bars over the full two-month period.
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_strategies(
            provider,
            vec![
                FetchStrategy {
                    interval: BarInterval::FiveMinute,
                    range: FetchRange::Days(60),
                },
                FetchStrategy {
                    interval: BarInterval::Daily,
                    range: FetchRange::Months(2),
                },
            ],
        )
    }

    pub fn with_strategies(
        provider: Arc<dyn MarketDataProvider>,
        strategies: Vec<FetchStrategy>,
    ) -> Self {
        Self {
            provider,
            strategies,
        }
    }

    /// Bars from the first strategy that yields data, or None when the
    /// symbol is definitively unavailable.
    pub async fn fetch_history(&self, symbol: &str) -> Option<Vec<PriceBar>> {
        for strategy in &self.strategies {
            match self
                .provider
                .fetch_bars(symbol, strategy.interval, strategy.range)
                .await
            {
                Ok(bars) if !bars.is_empty() => return Some(bars),
                Ok(_) => {
                    debug!(
                        "{}: no {} bars over {}, trying next strategy",
                        symbol,
                        strategy.interval.as_query(),
                        strategy.range.as_query()
                    );
                }
                Err(e) => {
                    debug!(
                        "{}: {} fetch failed ({}), trying next strategy",
                        symbol,
                        strategy.interval.as_query(),
                        e
                    );
                }
            }
        }
        None
    }
}
