use thiserror::Error;

/// Errors related to market data retrieval
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("No usable price history for {symbol}")]
    Unavailable { symbol: String },

    #[error("Malformed provider response for {symbol}: {reason}")]
    InvalidResponse { symbol: String, reason: String },

    #[error("Rate limit exceeded: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("Response decode failed: {0}")]
    Decode(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether retrying the same request later could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MarketDataError::RateLimited { .. }
                | MarketDataError::Transport(_)
                | MarketDataError::Decode(_)
        )
    }
}

/// Errors related to the ticker universe source
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("Universe source returned no usable symbols")]
    Empty,

    #[error("Universe fetch failed: {reason}")]
    FetchFailed { reason: String },
}
