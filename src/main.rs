use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use swingscan::application::fetch::HistoryFetcher;
use swingscan::application::orchestrator::BatchOrchestrator;
use swingscan::config::AnalyzerConfig;
use swingscan::infrastructure::cache::StatsCache;
use swingscan::infrastructure::export::RankingCsvExporter;
use swingscan::infrastructure::http_client_factory::HttpClientFactory;
use swingscan::infrastructure::market_data::YahooChartProvider;
use swingscan::infrastructure::universe::UniverseProvider;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Intraday swing analyzer: ranks a ticker universe by intraday volatility.
#[derive(Parser, Debug)]
#[command(name = "swingscan", version)]
struct Cli {
    /// Directory for ranking CSVs (overrides OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Process only the first N tickers of the universe
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
    let mut config = AnalyzerConfig::from_env()?;
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    info!("Starting intraday swing analysis...");

    let client = HttpClientFactory::create_client();

    let mut universe = UniverseProvider::new(client.clone()).load().await;
    if universe.is_empty() {
        anyhow::bail!("Ticker universe is empty; nothing to analyze");
    }
    if let Some(limit) = cli.limit {
        universe.truncate(limit);
        info!("Universe limited to {} tickers", universe.len());
    }

    let cache = Arc::new(StatsCache::load(
        config.cache_path.clone(),
        config.cache_expiry_hours,
    ));
    let provider = Arc::new(YahooChartProvider::new(client));
    let fetcher = HistoryFetcher::new(provider);
    let exporter = RankingCsvExporter::new(config.output_dir.clone());

    let orchestrator = BatchOrchestrator::new(fetcher, cache, exporter, config);
    let summary = orchestrator.run(&universe).await?;

    info!(
        "Analysis complete in {:.1}s: {} tickers ({} from cache), {} unavailable, {} CSV files",
        summary.elapsed_secs,
        summary.processed,
        summary.from_cache,
        summary.unavailable,
        summary.exported_files
    );

    Ok(())
}
