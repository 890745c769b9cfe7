//! Market data provider backed by the Yahoo Finance v8 chart API.

use crate::domain::errors::MarketDataError;
use crate::domain::market::PriceBar;
use crate::domain::ports::{BarInterval, FetchRange, MarketDataProvider};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, trace};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub struct YahooChartProvider {
    client: ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

impl YahooChartProvider {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self {
            client,
            base_url: CHART_BASE_URL.to_string(),
        }
    }

    /// Turn a parsed chart payload into ordered bars, skipping rows with
    /// missing OHLC values and enforcing strictly increasing timestamps.
    fn bars_from_result(symbol: &str, result: ChartResult) -> Vec<PriceBar> {
        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        let opens = quote.open.unwrap_or_default();
        let highs = quote.high.unwrap_or_default();
        let lows = quote.low.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();
        let volumes = quote.volume.unwrap_or_default();

        let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
        let mut last_ts = i64::MIN;

        for (i, ts) in timestamps.iter().enumerate() {
            let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
                opens.get(i).copied(),
                highs.get(i).copied(),
                lows.get(i).copied(),
                closes.get(i).copied(),
            ) else {
                trace!("{}: dropping incomplete row at index {}", symbol, i);
                continue;
            };

            if *ts <= last_ts {
                continue;
            }
            let Some(timestamp) = Utc.timestamp_opt(*ts, 0).single() else {
                continue;
            };
            last_ts = *ts;

            bars.push(PriceBar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: volumes.get(i).copied().flatten().unwrap_or(0.0),
            });
        }

        bars
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: BarInterval,
        range: FetchRange,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let url = format!("{}/{}", self.base_url, symbol);
        let query = [
            ("interval", interval.as_query().to_string()),
            ("range", range.as_query()),
            ("includePrePost", "false".to_string()),
        ];

        let response = self.client.get(&url).query(&query).send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Err(MarketDataError::RateLimited { retry_after_secs });
        }

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MarketDataError::Unavailable {
                symbol: symbol.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(MarketDataError::InvalidResponse {
                symbol: symbol.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let envelope: ChartEnvelope = response.json().await?;

        if let Some(error) = envelope.chart.error {
            if !error.is_null() {
                debug!("{}: provider-side error: {}", symbol, error);
                return Err(MarketDataError::Unavailable {
                    symbol: symbol.to_string(),
                });
            }
        }

        let Some(result) = envelope
            .chart
            .result
            .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
        else {
            return Err(MarketDataError::Unavailable {
                symbol: symbol.to_string(),
            });
        };

        Ok(Self::bars_from_result(symbol, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_payload(payload: &str) -> ChartResult {
        let envelope: ChartEnvelope = serde_json::from_str(payload).unwrap();
        envelope.chart.result.unwrap().remove(0)
    }

    #[test]
    fn test_rows_with_nulls_are_skipped() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700000300, 1700000600],
                    "indicators": {
                        "quote": [{
                            "open":   [100.0, null, 101.0],
                            "high":   [101.0, 102.0, 102.5],
                            "low":    [99.5, 100.0, 100.5],
                            "close":  [100.5, 101.5, 102.0],
                            "volume": [1000.0, 2000.0, null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let bars = YahooChartProvider::bars_from_result("TEST", parse_payload(payload));
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 100.0);
        // Missing volume defaults to zero rather than dropping the row.
        assert_eq!(bars[1].volume, 0.0);
    }

    #[test]
    fn test_duplicate_timestamps_are_dropped() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1700000000, 1700000000, 1700000300],
                    "indicators": {
                        "quote": [{
                            "open":   [100.0, 100.1, 100.2],
                            "high":   [101.0, 101.1, 101.2],
                            "low":    [99.0, 99.1, 99.2],
                            "close":  [100.5, 100.6, 100.7],
                            "volume": [1.0, 1.0, 1.0]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let bars = YahooChartProvider::bars_from_result("TEST", parse_payload(payload));
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn test_empty_result_yields_no_bars() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": null,
                    "indicators": { "quote": [{}] }
                }],
                "error": null
            }
        }"#;

        let bars = YahooChartProvider::bars_from_result("TEST", parse_payload(payload));
        assert!(bars.is_empty());
    }
}
