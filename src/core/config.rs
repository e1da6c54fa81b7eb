use std::path::PathBuf;
use std::time::Duration;
use crate::core::types::SearchMode;

pub const DEFAULT_THREADS: usize = 5;
pub const DEFAULT_CRAWL_LIMIT: usize = 1;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    /// Worker threads; `None` runs every phase on the calling thread.
    pub threads: Option<usize>,
    pub crawl_limit: usize,
    pub search_mode: SearchMode,
    pub fetch_timeout: Duration,

    // Inputs
    pub text_path: Option<PathBuf>,
    pub seed_url: Option<String>,
    pub query_path: Option<PathBuf>,

    // Snapshot outputs
    pub index_path: Option<PathBuf>,
    pub counts_path: Option<PathBuf>,
    pub results_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            threads: None,
            crawl_limit: DEFAULT_CRAWL_LIMIT,
            search_mode: SearchMode::Exact,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,

            text_path: None,
            seed_url: None,
            query_path: None,

            index_path: None,
            counts_path: None,
            results_path: None,
        }
    }
}

impl Config {
    /// Parses a worker count, falling back to the default for values below one or
    /// anything that is not an integer.
    pub fn parse_threads(raw: &str) -> usize {
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 => n as usize,
            _ => {
                tracing::warn!("Invalid thread count {:?}, using {}", raw, DEFAULT_THREADS);
                DEFAULT_THREADS
            }
        }
    }

    pub fn parse_crawl_limit(raw: &str) -> usize {
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 => n as usize,
            _ => {
                tracing::warn!("Invalid crawl limit {:?}, using {}", raw, DEFAULT_CRAWL_LIMIT);
                DEFAULT_CRAWL_LIMIT
            }
        }
    }

    /// Crawling always runs on the worker pool.
    pub fn is_threaded(&self) -> bool {
        self.threads.is_some() || self.seed_url.is_some()
    }

    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }
}
