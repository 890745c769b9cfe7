//! Drives the universe through fetch → compute → cache → rank → export.

use crate::application::analytics::resample::resample_to_daily;
use crate::application::analytics::window_stats::compute_ticker_stats;
use crate::application::fetch::HistoryFetcher;
use crate::application::ranking::{aggregate, rank};
use crate::config::AnalyzerConfig;
use crate::domain::market::{AnalysisWindow, TickerStats};
use crate::infrastructure::cache::StatsCache;
use crate::infrastructure::export::RankingCsvExporter;
use crate::infrastructure::universe::TickerUniverse;
use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Flush the cache to disk after this many processed batches.
const FLUSH_EVERY_BATCHES: usize = 5;

#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub from_cache: usize,
    pub unavailable: usize,
    pub insufficient: usize,
    pub exported_files: usize,
    pub elapsed_secs: f64,
}

enum TickerOutcome {
    Cached(TickerStats),
    Fresh(TickerStats),
    Unavailable,
    Insufficient,
}

pub struct BatchOrchestrator {
    fetcher: HistoryFetcher,
    cache: Arc<StatsCache>,
    exporter: RankingCsvExporter,
    config: AnalyzerConfig,
}

impl BatchOrchestrator {
    pub fn new(
        fetcher: HistoryFetcher,
        cache: Arc<StatsCache>,
        exporter: RankingCsvExporter,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            fetcher,
            cache,
            exporter,
            config,
        }
    }

    /// Run the full analysis: every ticker in batches, then one
    /// aggregate/rank/export pass per window.
    pub async fn run(&self, universe: &TickerUniverse) -> Result<RunSummary> {
        let started = Instant::now();
        let tickers = universe.all();
        let total_batches = tickers.len().div_ceil(self.config.batch_size);
        info!("Analyzing {} tickers in {} batches", tickers.len(), total_batches);

        let mut summary = RunSummary::default();
        let mut all_stats: Vec<TickerStats> = Vec::new();

        for (batch_index, batch) in tickers.chunks(self.config.batch_size).enumerate() {
            info!(
                "Processing batch {}/{} ({} tickers)...",
                batch_index + 1,
                total_batches,
                batch.len()
            );

            // `buffered` (not `buffer_unordered`) keeps results in universe
            // order, so tie-broken rankings are stable across runs.
            let outcomes: Vec<TickerOutcome> = stream::iter(batch)
                .map(|ticker| self.process_ticker(ticker))
                .buffered(self.config.fetch_concurrency)
                .collect()
                .await;

            for outcome in outcomes {
                match outcome {
                    TickerOutcome::Cached(stats) => {
                        summary.processed += 1;
                        summary.from_cache += 1;
                        all_stats.push(stats);
                    }
                    TickerOutcome::Fresh(stats) => {
                        summary.processed += 1;
                        all_stats.push(stats);
                    }
                    TickerOutcome::Unavailable => summary.unavailable += 1,
                    TickerOutcome::Insufficient => summary.insufficient += 1,
                }
            }

            if (batch_index + 1) % FLUSH_EVERY_BATCHES == 0 {
                if let Err(e) = self.cache.flush().await {
                    warn!("Periodic cache flush failed: {}", e);
                }
            }
        }

        if let Err(e) = self.cache.flush().await {
            warn!("Final cache flush failed: {}", e);
        }

        info!(
            "Processed {}/{} tickers ({} cached, {} unavailable, {} insufficient)",
            summary.processed,
            tickers.len(),
            summary.from_cache,
            summary.unavailable,
            summary.insufficient
        );

        let aggregated = aggregate(all_stats, &universe.etf_set());
        for window in AnalysisWindow::ALL {
            info!("Generating rankings for {}...", window);
            for table in rank(&aggregated, window) {
                match self.exporter.export(&table) {
                    Ok(path) => {
                        summary.exported_files += 1;
                        info!("Exported {:?} ({} rows)", path, table.rows.len());
                    }
                    Err(e) => {
                        error!(
                            "Export failed for {}/{}/{}: {}",
                            table.category, table.kind, table.window, e
                        );
                    }
                }
            }
        }

        summary.elapsed_secs = started.elapsed().as_secs_f64();
        Ok(summary)
    }

    /// Cache-first processing of one ticker. Failures at any stage resolve
    /// to an outcome, never an error — one ticker cannot abort a batch.
    async fn process_ticker(&self, ticker: &str) -> TickerOutcome {
        if let Some(stats) = self.cache.get(ticker).await {
            return TickerOutcome::Cached(stats);
        }

        let Some(bars) = self.fetcher.fetch_history(ticker).await else {
            return TickerOutcome::Unavailable;
        };

        let daily = resample_to_daily(&bars);
        match compute_ticker_stats(ticker, &daily, self.config.min_days) {
            Some(stats) => {
                self.cache.put(ticker, stats.clone()).await;
                TickerOutcome::Fresh(stats)
            }
            None => TickerOutcome::Insufficient,
        }
    }
}
