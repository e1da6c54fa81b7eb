use std::path::Path;
use std::sync::Arc;
use crate::analysis::analyzer::Analyzer;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::web_crawler::WebCrawler;
use crate::index::concurrent::ConcurrentIndex;
use crate::index::inverted::InvertedIndex;
use crate::parallel::task_queue::TaskQueue;
use crate::parallel::text_indexer::TextIndexer;
use crate::query::engine::QueryEngine;

/// Runs every phase the configuration asks for: ingest, crawl, query, export.
///
/// A failing phase is logged and the remaining phases still run, so a bad query
/// file does not prevent the index snapshot from being written.
pub fn run(config: &Config) -> Result<()> {
    let analyzer = Arc::new(Analyzer::standard_english());
    let queue = config.is_threaded().then(|| Arc::new(TaskQueue::new(config.worker_count())));

    let index = match &queue {
        Some(queue) => {
            let index = Arc::new(ConcurrentIndex::new());
            ingest_parallel(config, &analyzer, &index, queue);
            index
        }
        None => Arc::new(ConcurrentIndex::from_index(ingest(config, &analyzer))),
    };

    let engine = match &queue {
        Some(queue) => QueryEngine::with_queue(index.clone(), Arc::clone(&analyzer), Arc::clone(queue)),
        None => QueryEngine::new(index.clone(), Arc::clone(&analyzer)),
    };

    if let Some(path) = &config.query_path {
        if let Err(e) = engine.process_file(path, config.search_mode) {
            tracing::error!("Query processing failed for {}: {}", path.display(), e);
        }
    }

    export(config.counts_path.as_deref(), "counts", |path| index.write_counts(path));
    export(config.index_path.as_deref(), "index", |path| index.write_index(path));
    export(config.results_path.as_deref(), "results", |path| engine.write_results(path));

    if let Some(queue) = queue {
        queue.shutdown();
    }
    Ok(())
}

fn ingest(config: &Config, analyzer: &Arc<Analyzer>) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    if let Some(path) = &config.text_path {
        let indexer = TextIndexer::new(Arc::clone(analyzer));
        if let Err(e) = indexer.index_path(path, &mut index) {
            tracing::error!("Text ingestion failed: {}", e);
        }
        tracing::info!("Indexed {} files", indexer.get_progress());
    }
    index
}

fn ingest_parallel(
    config: &Config,
    analyzer: &Arc<Analyzer>,
    index: &Arc<ConcurrentIndex>,
    queue: &Arc<TaskQueue>,
) {
    if let Some(path) = &config.text_path {
        let indexer = TextIndexer::new(Arc::clone(analyzer));
        if let Err(e) = indexer.index_path_parallel(path, index, queue) {
            tracing::error!("Text ingestion failed: {}", e);
        }
        tracing::info!("Indexed {} files", indexer.get_progress());
    }

    if let Some(seed) = &config.seed_url {
        let crawl = HttpFetcher::new(config.fetch_timeout).and_then(|fetcher| {
            WebCrawler::new(
                Arc::clone(index),
                Arc::clone(analyzer),
                Arc::new(fetcher),
                Arc::clone(queue),
                config.crawl_limit,
            )
            .crawl(seed)
        });
        if let Err(e) = crawl {
            tracing::error!("Crawl from {} failed: {}", seed, e);
        }
    }
}

fn export(path: Option<&Path>, what: &str, write: impl FnOnce(&Path) -> Result<()>) {
    if let Some(path) = path {
        if let Err(e) = write(path) {
            tracing::error!("Failed to write {}: {}", what, e);
        }
    }
}
