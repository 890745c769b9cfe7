use clap::Parser;
use std::sync::Arc;
use swingscan::application::scanner::LiveScanner;
use swingscan::config::ScannerConfig;
use swingscan::domain::ports::AlertTransport;
use swingscan::infrastructure::http_client_factory::HttpClientFactory;
use swingscan::infrastructure::market_data::YahooChartProvider;
use swingscan::infrastructure::telegram::TelegramNotifier;
use swingscan::infrastructure::universe::UniverseProvider;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Continuous volatility scanner: alerts on outlier intraday moves.
#[derive(Parser, Debug)]
#[command(name = "scanner", version)]
struct Cli {
    /// Seconds between scan cycles (overrides SCAN_INTERVAL_SECS)
    #[arg(long)]
    interval: Option<u64>,

    /// Scan only the first N tickers of the universe
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = ScannerConfig::from_env()?;
    if let Some(interval) = cli.interval {
        config.scan_interval_secs = interval;
    }

    let client = HttpClientFactory::create_client();

    let mut universe = UniverseProvider::new(client.clone()).load().await;
    if universe.is_empty() {
        anyhow::bail!("Ticker universe is empty; nothing to scan");
    }
    if let Some(limit) = cli.limit {
        universe.truncate(limit);
    }

    let transport: Option<Arc<dyn AlertTransport>> = TelegramNotifier::from_env(client.clone())
        .map(|notifier| Arc::new(notifier) as Arc<dyn AlertTransport>);

    let provider = Arc::new(YahooChartProvider::new(client));
    let mut scanner = LiveScanner::new(provider, transport, universe.all(), config);

    info!("Scanner initialized. Press Ctrl+C to stop.");
    scanner.run().await;

    Ok(())
}
