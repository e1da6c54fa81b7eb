use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::Mutex;
use url::Url;
use webdex::analysis::analyzer::Analyzer;
use webdex::core::error::{Error, Result};
use webdex::crawler::fetcher::Fetcher;
use webdex::crawler::web_crawler::WebCrawler;
use webdex::index::concurrent::ConcurrentIndex;
use webdex::parallel::task_queue::TaskQueue;

/// Serves canned pages and records every fetch.
struct StubFetcher {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn new(pages: Vec<(String, String)>) -> Self {
        StubFetcher {
            pages: pages.into_iter().collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        let mut fetched = self.fetched.lock().clone();
        fetched.sort();
        fetched
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        self.fetched.lock().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| Error::network(format!("{} unreachable", url)))
    }
}

fn page(body: &str, links: &[&str]) -> String {
    let anchors: String = links.iter().map(|l| format!("<a href=\"{}\">link</a>", l)).collect();
    format!("<html><head><title>ignored</title></head><body><p>{}</p>{}</body></html>", body, anchors)
}

fn crawl(fetcher: Arc<StubFetcher>, seed: &str, limit: usize) -> (Arc<ConcurrentIndex>, usize) {
    let index = Arc::new(ConcurrentIndex::new());
    let queue = Arc::new(TaskQueue::new(4));
    let crawler = WebCrawler::new(
        Arc::clone(&index),
        Arc::new(Analyzer::standard_english()),
        fetcher,
        Arc::clone(&queue),
        limit,
    );
    let summary = crawler.crawl(seed).unwrap();
    queue.shutdown();
    (index, summary.scheduled)
}

#[test]
fn limit_one_fetches_only_the_seed() {
    let links = ["/1", "/2", "/3", "/4", "/5"];
    let mut pages = vec![("https://site.test/".to_string(), page("seed page", &links))];
    for link in links {
        pages.push((format!("https://site.test{}", link), page("child", &[])));
    }
    let fetcher = Arc::new(StubFetcher::new(pages));

    let (index, scheduled) = crawl(Arc::clone(&fetcher), "https://site.test/", 1);

    assert_eq!(scheduled, 1);
    assert_eq!(fetcher.fetched(), vec!["https://site.test/".to_string()]);
    assert_eq!(index.num_counts(), 1);
    assert!(index.has_word("seed"));
    assert!(!index.has_word("ignor"));
}

#[test]
fn duplicate_and_fragment_links_are_fetched_once() {
    let pages = vec![
        ("https://site.test/".to_string(), page("home", &["a.html", "a.html#part", "/a.html", "b.html"])),
        ("https://site.test/a.html".to_string(), page("alpha", &["/", "b.html"])),
        ("https://site.test/b.html".to_string(), page("beta", &["a.html"])),
    ];
    let fetcher = Arc::new(StubFetcher::new(pages));

    let (index, scheduled) = crawl(Arc::clone(&fetcher), "https://site.test/#top", 50);

    assert_eq!(scheduled, 3);
    assert_eq!(fetcher.fetched(), vec![
        "https://site.test/".to_string(),
        "https://site.test/a.html".to_string(),
        "https://site.test/b.html".to_string(),
    ]);
    assert_eq!(index.locations("alpha"), vec!["https://site.test/a.html".to_string()]);
}

#[test]
fn failed_fetch_does_not_stop_crawl() {
    let pages = vec![
        ("https://site.test/".to_string(), page("home", &["/missing", "/ok"])),
        ("https://site.test/ok".to_string(), page("fine", &[])),
    ];
    let fetcher = Arc::new(StubFetcher::new(pages));

    let (index, scheduled) = crawl(Arc::clone(&fetcher), "https://site.test/", 10);

    assert_eq!(scheduled, 3);
    assert_eq!(fetcher.fetched().len(), 3);
    assert_eq!(index.num_counts(), 2);
    assert!(index.has_word("fine"));
}

#[test]
fn scheduled_pages_never_exceed_limit() {
    let mut pages = Vec::new();
    for i in 0..20 {
        let links: Vec<String> = (0..20).map(|j| format!("/p{}", j)).collect();
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        let url = if i == 0 { "https://site.test/".to_string() } else { format!("https://site.test/p{}", i) };
        pages.push((url, page("word", &links)));
    }
    let fetcher = Arc::new(StubFetcher::new(pages));

    let (_, scheduled) = crawl(Arc::clone(&fetcher), "https://site.test/", 7);

    assert_eq!(scheduled, 7);
    assert_eq!(fetcher.fetched().len(), 7);
}

#[test]
fn malformed_seed_is_rejected() {
    let fetcher = Arc::new(StubFetcher::new(Vec::new()));
    let index = Arc::new(ConcurrentIndex::new());
    let queue = Arc::new(TaskQueue::new(2));
    let crawler = WebCrawler::new(index, Arc::new(Analyzer::standard_english()), fetcher, queue, 5);
    assert!(crawler.crawl("not a url").is_err());
}
