use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use url::Url;
use crate::analysis::analyzer::Analyzer;
use crate::core::error::Result;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::{html, links};
use crate::index::concurrent::ConcurrentIndex;
use crate::index::inverted::InvertedIndex;
use crate::parallel::task_queue::TaskQueue;

/// Outcome of one crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    /// URLs admitted to the visited set, seed included.
    pub scheduled: usize,
    /// Pages fetched and indexed successfully.
    pub indexed: usize,
}

/// Breadth of a crawl is bounded by `limit`: at most that many URLs are ever
/// scheduled, counting the seed.
pub struct WebCrawler {
    state: Arc<CrawlState>,
    queue: Arc<TaskQueue>,
}

struct CrawlState {
    index: Arc<ConcurrentIndex>,
    analyzer: Arc<Analyzer>,
    fetcher: Arc<dyn Fetcher>,
    visited: Mutex<HashSet<Url>>,
    limit: usize,
    indexed: AtomicUsize,
}

impl WebCrawler {
    pub fn new(
        index: Arc<ConcurrentIndex>,
        analyzer: Arc<Analyzer>,
        fetcher: Arc<dyn Fetcher>,
        queue: Arc<TaskQueue>,
        limit: usize,
    ) -> Self {
        WebCrawler {
            state: Arc::new(CrawlState {
                index,
                analyzer,
                fetcher,
                visited: Mutex::new(HashSet::new()),
                limit: limit.max(1),
                indexed: AtomicUsize::new(0),
            }),
            queue,
        }
    }

    /// Crawls from `seed` and returns once no fetch is pending or running.
    pub fn crawl(&self, seed: &str) -> Result<CrawlSummary> {
        let seed = links::normalize_url(seed)?;
        tracing::info!("Crawling from {} (limit {})", seed, self.state.limit);

        {
            let mut visited = self.state.visited.lock();
            if visited.len() < self.state.limit && visited.insert(seed.clone()) {
                schedule(&self.state, &self.queue, seed)?;
            }
        }

        self.queue.await_idle();

        let summary = CrawlSummary {
            scheduled: self.state.visited.lock().len(),
            indexed: self.state.indexed.load(Ordering::SeqCst),
        };
        tracing::info!("Crawl finished: {} scheduled, {} indexed", summary.scheduled, summary.indexed);
        Ok(summary)
    }
}

fn schedule(state: &Arc<CrawlState>, queue: &Arc<TaskQueue>, url: Url) -> Result<()> {
    let task_state = Arc::clone(state);
    let task_queue = Arc::clone(queue);
    queue.submit(move || {
        process_page(&task_state, &task_queue, &url);
        Ok(())
    })
}

/// Fetch, extract links, then index. A page that cannot be fetched is dropped.
fn process_page(state: &Arc<CrawlState>, queue: &Arc<TaskQueue>, url: &Url) {
    let url = match links::normalize_url(url.as_str()) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Dropping {}: {}", url, e);
            return;
        }
    };

    let page = match state.fetcher.fetch(&url) {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Dropping {}: {}", url, e);
            return;
        }
    };

    let cleaned = html::strip_block_elements(&page);
    schedule_links(state, queue, links::list_urls(&url, &cleaned));

    let text = html::strip_entities(&html::strip_tags(&cleaned));
    let mut local = InvertedIndex::new();
    local.add_batch(state.analyzer.stems(&text), url.as_str(), 0);
    state.index.merge_from(&local);

    state.indexed.fetch_add(1, Ordering::SeqCst);
    tracing::debug!("Indexed {}", url);
}

/// Admits new URLs while the visited set is under the limit. Check, insert and
/// submit happen under one lock so racing pages never overshoot the limit.
fn schedule_links(state: &Arc<CrawlState>, queue: &Arc<TaskQueue>, urls: Vec<Url>) {
    let mut visited = state.visited.lock();
    for url in urls {
        if visited.len() >= state.limit {
            break;
        }
        if visited.contains(&url) {
            continue;
        }
        visited.insert(url.clone());
        if let Err(e) = schedule(state, queue, url) {
            tracing::warn!("Could not schedule link: {}", e);
        }
    }
}
