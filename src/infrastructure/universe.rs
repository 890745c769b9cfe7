//! Ticker universe assembly: curated lists merged with exchange listings.

use crate::domain::errors::UniverseError;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

const NASDAQ_SCREENER_URL: &str = "https://api.nasdaq.com/api/screener/stocks";

/// Longest symbol accepted from the exchange listing; longer strings are
/// usually warrants, units or test entries.
const MAX_SYMBOL_LEN: usize = 5;

// Broad market, sector, leveraged and crypto-adjacent ETFs with enough
// daily movement to be worth screening.
const CURATED_ETFS: [&str; 48] = [
    "SPY", "QQQ", "DIA", "IWM", "VTI", "GLD", "SLV", "USO", "TLT", "HYG",
    "EFA", "EEM", "FXI", "XLF", "XLE", "XLI", "XLK", "XLV", "XLY", "XLU",
    "XBI", "XRT", "XOP", "XME", "TQQQ", "SQQQ", "SPXL", "SPXS", "UPRO", "SPXU",
    "SOXL", "SOXS", "TECL", "TECS", "LABU", "LABD", "FAS", "FAZ", "TNA", "TZA",
    "BOIL", "KOLD", "NUGT", "DUST", "BITO", "GBTC", "IBIT", "ARKK",
];

// High-beta single names: large-cap tech, EV, crypto miners, meme favorites.
const CURATED_STOCKS: [&str; 64] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "NFLX", "AMD", "INTC",
    "AVGO", "QCOM", "MU", "SMCI", "PLTR", "SNOW", "CRWD", "ZS", "NET", "DDOG",
    "MDB", "OKTA", "TEAM", "SHOP", "SQ", "PYPL", "COIN", "HOOD", "SOFI", "UPST",
    "AFRM", "RBLX", "U", "ROKU", "ZM", "PTON", "LCID", "RIVN", "NIO", "XPEV",
    "LI", "F", "GM", "MARA", "RIOT", "CLSK", "HUT", "MSTR", "GME", "AMC",
    "BB", "SNDL", "TLRY", "CGC", "SPCE", "ASTS", "OPEN", "MRNA", "BNTX", "NVAX",
    "VRTX", "REGN", "DXCM", "ALGN",
];

/// The candidate symbol set, partitioned by category. A ticker belongs to
/// exactly one category; on collision the ETF classification wins.
#[derive(Debug, Clone)]
pub struct TickerUniverse {
    etfs: Vec<String>,
    stocks: Vec<String>,
}

impl TickerUniverse {
    pub fn new(etfs: Vec<String>, stocks: Vec<String>) -> Self {
        let etf_names: BTreeSet<String> =
            etfs.into_iter().map(|s| s.trim().to_uppercase()).collect();
        let stock_names: BTreeSet<String> = stocks
            .into_iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !etf_names.contains(s))
            .collect();

        Self {
            etfs: etf_names.into_iter().collect(),
            stocks: stock_names.into_iter().collect(),
        }
    }

    pub fn etfs(&self) -> &[String] {
        &self.etfs
    }

    pub fn stocks(&self) -> &[String] {
        &self.stocks
    }

    /// Every symbol, ETFs first.
    pub fn all(&self) -> Vec<String> {
        self.etfs.iter().chain(self.stocks.iter()).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.etfs.len() + self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.etfs.is_empty() && self.stocks.is_empty()
    }

    /// Membership set driving aggregation categories.
    pub fn etf_set(&self) -> HashSet<String> {
        self.etfs.iter().cloned().collect()
    }

    /// Cap the universe at `limit` symbols, keeping category order.
    pub fn truncate(&mut self, limit: usize) {
        if limit <= self.etfs.len() {
            self.etfs.truncate(limit);
            self.stocks.clear();
        } else {
            self.stocks.truncate(limit - self.etfs.len());
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScreenerEnvelope {
    data: Option<ScreenerData>,
}

#[derive(Debug, Deserialize)]
struct ScreenerData {
    rows: Option<Vec<ScreenerRow>>,
}

#[derive(Debug, Deserialize)]
struct ScreenerRow {
    symbol: Option<String>,
}

pub struct UniverseProvider {
    client: ClientWithMiddleware,
}

impl UniverseProvider {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }

    /// Curated lists merged best-effort with the NASDAQ screener listing.
    /// Listing failures degrade to the curated universe, never to an error.
    pub async fn load(&self) -> TickerUniverse {
        let mut stocks: Vec<String> =
            CURATED_STOCKS.iter().map(|s| s.to_string()).collect();

        match self.fetch_nasdaq_listed().await {
            Ok(listed) => {
                info!("Merged {} exchange-listed symbols into the universe", listed.len());
                stocks.extend(listed);
            }
            Err(e) => {
                warn!("Could not fetch exchange listing: {}. Using curated lists only.", e);
            }
        }

        let universe = TickerUniverse::new(
            CURATED_ETFS.iter().map(|s| s.to_string()).collect(),
            stocks,
        );
        info!(
            "Universe ready: {} ETFs, {} stocks",
            universe.etfs().len(),
            universe.stocks().len()
        );
        universe
    }

    async fn fetch_nasdaq_listed(&self) -> Result<Vec<String>, UniverseError> {
        let response = self
            .client
            .get(NASDAQ_SCREENER_URL)
            .query(&[("tableonly", "true"), ("limit", "10000"), ("offset", "0")])
            .send()
            .await
            .map_err(|e| UniverseError::FetchFailed {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(UniverseError::FetchFailed {
                reason: format!("HTTP {}", response.status()),
            });
        }

        let envelope: ScreenerEnvelope =
            response.json().await.map_err(|e| UniverseError::FetchFailed {
                reason: e.to_string(),
            })?;

        let symbols: Vec<String> = envelope
            .data
            .and_then(|d| d.rows)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|row| row.symbol)
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty() && s.len() <= MAX_SYMBOL_LEN)
            .collect();

        if symbols.is_empty() {
            return Err(UniverseError::Empty);
        }

        Ok(symbols)
    }
}
