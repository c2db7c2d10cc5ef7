use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod article;
mod collectors;
mod config;
mod sanitize;
mod store;

use collectors::{NaverNewsCollector, NewsCollector};
use config::NewsConfig;
use store::{AppendReport, CsvStore, DedupPolicy};

/// Fetch the latest news for a company and append unseen articles to a CSV file.
#[derive(Parser, Debug)]
struct Args {
    /// Search term; defaults to NEWS_QUERY or the built-in company name
    #[arg(long)]
    query: Option<String>,

    /// Number of articles to request (1-100)
    #[arg(long)]
    display: Option<u32>,

    /// Destination CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// News search endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Also skip duplicates written earlier in the same run
    #[arg(long)]
    dedup_within_batch: bool,
}

impl Args {
    fn apply(self, config: &mut NewsConfig) {
        if let Some(query) = self.query {
            config.query = query;
        }
        if let Some(display) = self.display {
            config.display = display;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if self.dedup_within_batch {
            config.dedup = DedupPolicy::PerRow;
        }
    }
}

#[derive(Debug, PartialEq)]
struct RunSummary {
    fetched: usize,
    report: AppendReport,
}

/// One fetch-and-save cycle. The CSV is not touched when nothing was fetched.
fn run(config: &NewsConfig, collector: &dyn NewsCollector) -> Result<RunSummary> {
    let items = collector
        .collect_news(&config.query, config.display)
        .with_context(|| format!("Failed to fetch news for {}", config.query))?;
    if items.is_empty() {
        return Ok(RunSummary { fetched: 0, report: AppendReport::default() });
    }

    let store = CsvStore::new(&config.output_path);
    let report = store
        .append(&items, config.dedup)
        .with_context(|| format!("Failed to save news to {}", store.path().display()))?;
    info!(
        fetched = items.len(),
        appended = report.appended,
        skipped = report.skipped,
        path = %store.path().display(),
        "news saved"
    );
    Ok(RunSummary { fetched: items.len(), report })
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut config = NewsConfig::from_env()?;
    args.apply(&mut config);
    config.validate()?;
    debug!(?config, "resolved configuration");

    println!("Fetching news...");
    let collector = NaverNewsCollector::new(&config)?;
    let summary = run(&config, &collector)?;
    if summary.fetched > 0 {
        println!("Saved {} news articles to CSV.", summary.fetched);
    }
    Ok(())
}
