use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use webdex::core::config::Config;
use webdex::core::types::SearchMode;
use webdex::driver;

#[derive(Parser)]
#[command(
    name = "webdex",
    about = "Builds an inverted index from text files or crawled pages and answers ranked queries",
    version
)]
struct Cli {
    /// File or directory of .txt/.text files to index
    #[arg(long)]
    text: Option<PathBuf>,

    /// Seed URL to crawl
    #[arg(long)]
    html: Option<String>,

    /// Worker threads; values below 1 or non-numbers fall back to 5
    #[arg(long, num_args = 0..=1, default_missing_value = "5")]
    threads: Option<String>,

    /// Maximum number of pages to crawl, seed included
    #[arg(long)]
    crawl: Option<String>,

    /// Newline-delimited query file
    #[arg(long)]
    query: Option<PathBuf>,

    /// Treat query words as prefixes
    #[arg(long)]
    partial: bool,

    /// Write the inverted index as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = "index.json")]
    index: Option<PathBuf>,

    /// Write per-location word counts as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = "counts.json")]
    counts: Option<PathBuf>,

    /// Write query results as JSON
    #[arg(long, num_args = 0..=1, default_missing_value = "results.json")]
    results: Option<PathBuf>,

    /// Per-page fetch timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            threads: self.threads.as_deref().map(Config::parse_threads),
            crawl_limit: self.crawl.as_deref().map_or(Config::default().crawl_limit, Config::parse_crawl_limit),
            search_mode: SearchMode::from_partial(self.partial),
            fetch_timeout: Duration::from_secs(self.timeout_secs),
            text_path: self.text,
            seed_url: self.html,
            query_path: self.query,
            index_path: self.index,
            counts_path: self.counts,
            results_path: self.results,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Cli::parse().into_config();
    tracing::debug!("{:?}", config);

    if let Err(e) = driver::run(&config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
