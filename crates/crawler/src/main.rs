//! CiteTrail crawler binary
//!
//! Discovers a citation graph from a research topic:
//! 1. Searches the scholar provider for seed papers
//! 2. Runs the bounded BFS traversal over their references
//! 3. Writes the discovered papers as a JSON artifact

use citetrail_acquire::{DocumentAcquirer, LopdfParser};
use citetrail_common::collab::SearchProvider;
use citetrail_common::{config::AppConfig, AppError, VERSION};
use citetrail_crawler::frontier::{Crawler, CrawlerConfig};
use citetrail_crawler::output;
use citetrail_search::SerperScholarClient;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "citetrail", version, about = "Discover a citation graph from a research topic")]
struct Cli {
    /// Research topic used to find the seed papers
    topic: String,

    /// Maximum number of papers in the graph
    #[arg(long)]
    max_papers: Option<usize>,

    /// Maximum BFS depth
    #[arg(long)]
    max_level: Option<u32>,

    /// Output path for the JSON artifact
    #[arg(long)]
    output: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    if let Some(max_papers) = cli.max_papers {
        config.crawl.max_papers = max_papers;
    }
    if let Some(max_level) = cli.max_level {
        config.crawl.max_level = max_level;
    }

    // Initialize tracing
    let level: Level = config
        .observability
        .log_level
        .parse()
        .unwrap_or(Level::INFO);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);
    if config.observability.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting CiteTrail v{}", VERSION);

    // Credentials are validated before any traversal work starts.
    let api_key = config.search.resolved_api_key().ok_or_else(|| AppError::Configuration {
        message: "search API key is not set (search.api_key or SERPER_API_KEY)".to_string(),
    })?;

    let search = Arc::new(SerperScholarClient::new(api_key, &config.search)?);
    let acquisition = Arc::new(DocumentAcquirer::new(&config.acquisition)?);
    let parser = Arc::new(LopdfParser);

    // Seed the graph from a topic search
    info!(topic = %cli.topic, "searching for seed papers");
    let mut seeds = search.search(&cli.topic).await?;
    seeds.truncate(config.crawl.seed_count);

    if seeds.is_empty() {
        warn!(topic = %cli.topic, "no seed papers found, nothing to do");
        return Ok(());
    }
    info!(seeds = seeds.len(), "seed papers found, starting traversal");

    // Ctrl-c stops launching new work; partial results are still written.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    let crawler = Crawler::new(
        search.clone(),
        acquisition,
        parser,
        CrawlerConfig {
            max_papers: config.crawl.max_papers,
            max_level: config.crawl.max_level,
            fetch_concurrency: config.crawl.fetch_concurrency,
            collaborator_timeout: config.collaborator_timeout(),
        },
    )
    .with_shutdown(shutdown_rx);

    let store = crawler.run(seeds).await;

    let output_path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.crawl.output_path));
    output::write_graph(&output_path, store.papers())?;

    info!(
        papers = store.len(),
        output = %output_path.display(),
        "CiteTrail run complete"
    );
    Ok(())
}
