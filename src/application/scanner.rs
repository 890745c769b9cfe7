//! Continuous volatility scanner emitting Z-score alerts.
//!
//! Each cycle fans out over the universe concurrently, standardizes the
//! latest 5-minute return per ticker, and alerts on outliers. The cooldown
//! ledger is owned by the scanner and only touched between awaits, so no
//! lock is needed; ticker failures are counted, never propagated.

use crate::application::analytics::zscore::{ZScoreConfig, ZScoreReading, compute_zscore};
use crate::config::ScannerConfig;
use crate::domain::market::Alert;
use crate::domain::ports::{AlertTransport, BarInterval, FetchRange, MarketDataProvider};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Extra age beyond the cooldown before a ledger entry is pruned.
const PRUNE_BUFFER_HOURS: i64 = 1;

/// Per-ticker "time of last alert" ledger bounding repeat alerts.
#[derive(Debug)]
pub struct CooldownLedger {
    last_alert: HashMap<String, DateTime<Utc>>,
    cooldown: Duration,
}

impl CooldownLedger {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_alert: HashMap::new(),
            cooldown,
        }
    }

    /// Whether `ticker` is outside its cooldown at `now`.
    pub fn allows(&self, ticker: &str, now: DateTime<Utc>) -> bool {
        match self.last_alert.get(ticker) {
            Some(last) => now - *last >= self.cooldown,
            None => true,
        }
    }

    /// Record a delivered alert. Suppressed repeats must NOT call this:
    /// the cooldown clock runs from the first delivered alert.
    pub fn record(&mut self, ticker: &str, now: DateTime<Utc>) {
        self.last_alert.insert(ticker.to_string(), now);
    }

    pub fn last_alert_at(&self, ticker: &str) -> Option<DateTime<Utc>> {
        self.last_alert.get(ticker).copied()
    }

    /// Drop entries old enough that they can no longer suppress anything.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.cooldown - Duration::hours(PRUNE_BUFFER_HOURS);
        self.last_alert.retain(|_, last| *last > cutoff);
    }

    pub fn len(&self) -> usize {
        self.last_alert.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_alert.is_empty()
    }
}

/// Alert predicate: |Z| must STRICTLY exceed the threshold, so a reading
/// landing exactly on the threshold does not fire.
pub fn breaches_threshold(zscore: f64, threshold: f64) -> bool {
    zscore.abs() > threshold
}

enum ProbeOutcome {
    Quiet,
    Signal(String, ZScoreReading),
    Failed,
}

#[derive(Debug, Default)]
pub struct CycleSummary {
    pub signals: usize,
    pub delivered: usize,
    pub suppressed: usize,
    pub errors: usize,
}

pub struct LiveScanner {
    provider: Arc<dyn MarketDataProvider>,
    transport: Option<Arc<dyn AlertTransport>>,
    tickers: Vec<String>,
    cooldown: CooldownLedger,
    zscore_config: ZScoreConfig,
    config: ScannerConfig,
    cycles: u64,
    alerts_sent: u64,
}

impl LiveScanner {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        transport: Option<Arc<dyn AlertTransport>>,
        tickers: Vec<String>,
        config: ScannerConfig,
    ) -> Self {
        let zscore_config = ZScoreConfig {
            window_days: config.volatility_window_days,
            min_bars: config.min_bars,
        };
        Self {
            provider,
            transport,
            tickers,
            cooldown: CooldownLedger::new(Duration::hours(config.cooldown_hours)),
            zscore_config,
            config,
            cycles: 0,
            alerts_sent: 0,
        }
    }

    pub fn cooldown(&self) -> &CooldownLedger {
        &self.cooldown
    }

    /// Scan until a shutdown signal arrives. The signal is observed at the
    /// inter-cycle suspension, so an in-flight cycle always completes.
    pub async fn run(&mut self) {
        info!(
            "Scanning {} tickers every {}s (|Z| > {:.1})",
            self.tickers.len(),
            self.config.scan_interval_secs,
            self.config.zscore_threshold
        );

        loop {
            self.scan_cycle().await;

            debug!("Waiting {}s until next scan...", self.config.scan_interval_secs);
            tokio::select! {
                _ = tokio::time::sleep(std::time::Duration::from_secs(
                    self.config.scan_interval_secs,
                )) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received. Stopping scanner.");
                    break;
                }
            }
        }
    }

    /// One complete pass over the universe.
    pub async fn scan_cycle(&mut self) -> CycleSummary {
        self.cycles += 1;
        let mut summary = CycleSummary::default();
        info!("Scan #{}: probing {} tickers...", self.cycles, self.tickers.len());

        let tickers = self.tickers.clone();
        for chunk in tickers.chunks(self.config.batch_size) {
            let outcomes =
                futures::future::join_all(chunk.iter().map(|t| self.probe_ticker(t))).await;

            for outcome in outcomes {
                match outcome {
                    ProbeOutcome::Quiet => {}
                    ProbeOutcome::Failed => summary.errors += 1,
                    ProbeOutcome::Signal(ticker, reading) => {
                        summary.signals += 1;
                        self.handle_signal(&ticker, reading, &mut summary).await;
                    }
                }
            }
        }

        self.cooldown.prune(Utc::now());

        info!(
            "Scan #{} complete: {} signals, {} delivered, {} suppressed, {} errors ({} alerts total)",
            self.cycles,
            summary.signals,
            summary.delivered,
            summary.suppressed,
            summary.errors,
            self.alerts_sent
        );
        summary
    }

    async fn handle_signal(
        &mut self,
        ticker: &str,
        reading: ZScoreReading,
        summary: &mut CycleSummary,
    ) {
        let now = Utc::now();
        if !self.cooldown.allows(ticker, now) {
            debug!("{}: signal suppressed by cooldown", ticker);
            summary.suppressed += 1;
            return;
        }

        let alert = Alert {
            ticker: ticker.to_string(),
            zscore: reading.zscore,
            percent_move: reading.percent_move,
            current_price: reading.current_price,
            timestamp: now,
        };

        self.cooldown.record(ticker, now);

        match &self.transport {
            Some(transport) => match transport.deliver(&alert).await {
                Ok(()) => {
                    self.alerts_sent += 1;
                    summary.delivered += 1;
                    info!(
                        "Alert sent: {} (Z={:.2}, {:+.2}%)",
                        alert.ticker, alert.zscore, alert.percent_move
                    );
                }
                Err(e) => {
                    error!("Failed to deliver alert for {}: {}", alert.ticker, e);
                }
            },
            None => {
                summary.delivered += 1;
                warn!(
                    "Alert (no transport configured): {} Z={:.2} {:+.2}%",
                    alert.ticker, alert.zscore, alert.percent_move
                );
            }
        }
    }

    /// Fetch and standardize one ticker. Every failure mode resolves to an
    /// outcome so sibling probes are never cancelled.
    async fn probe_ticker(&self, ticker: &str) -> ProbeOutcome {
        let bars = match self
            .provider
            .fetch_bars(ticker, BarInterval::FiveMinute, FetchRange::Days(5))
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                debug!("{}: probe failed: {}", ticker, e);
                return ProbeOutcome::Failed;
            }
        };

        if bars.is_empty() {
            return ProbeOutcome::Quiet;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        match compute_zscore(&closes, &self.zscore_config) {
            Some(reading) if breaches_threshold(reading.zscore, self.config.zscore_threshold) => {
                ProbeOutcome::Signal(ticker.to_string(), reading)
            }
            _ => ProbeOutcome::Quiet,
        }
    }
}
