use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use crate::analysis::analyzer::{join_terms, Analyzer};
use crate::core::error::Result;
use crate::core::types::{SearchMode, SearchResult};
use crate::index::search_index::SearchIndex;
use crate::parallel::task_queue::TaskQueue;
use crate::query::cache::{CacheStats, QueryCache};
use crate::writer::json_writer;

/// Answers query lines against an index and keeps every answer.
///
/// Lines are reduced to their canonical form (unique stems, sorted, space
/// separated), which is also the cache key, so reorderings and repeats of the same
/// terms are searched once. The mode is not part of the key: a session uses one mode.
/// With a task queue, every line of a batch runs as its own task.
pub struct QueryEngine {
    inner: Arc<EngineInner>,
    queue: Option<Arc<TaskQueue>>,
}

struct EngineInner {
    index: Arc<dyn SearchIndex>,
    analyzer: Arc<Analyzer>,
    cache: QueryCache,
}

impl EngineInner {
    fn process(&self, line: &str, mode: SearchMode) {
        if line.trim().is_empty() {
            return;
        }

        let terms = self.analyzer.unique_stems(line);
        if terms.is_empty() {
            return;
        }

        let key = join_terms(&terms);
        if self.cache.get_or_compute(&key, || self.index.search(&terms, mode)) {
            tracing::debug!("Searched {:?}", key);
        }
    }
}

impl QueryEngine {
    pub fn new(index: Arc<dyn SearchIndex>, analyzer: Arc<Analyzer>) -> Self {
        QueryEngine {
            inner: Arc::new(EngineInner {
                index,
                analyzer,
                cache: QueryCache::new(),
            }),
            queue: None,
        }
    }

    pub fn with_queue(index: Arc<dyn SearchIndex>, analyzer: Arc<Analyzer>, queue: Arc<TaskQueue>) -> Self {
        QueryEngine {
            queue: Some(queue),
            ..QueryEngine::new(index, analyzer)
        }
    }

    pub fn canonicalize(&self, line: &str) -> String {
        self.inner.analyzer.canonicalize(line)
    }

    /// Searches `line` unless its canonical form is already cached. Blank lines and
    /// lines without any word are ignored.
    pub fn process_query(&self, line: &str, mode: SearchMode) {
        self.inner.process(line, mode);
    }

    /// Processes every line and returns when all of them are answered.
    pub fn process_lines<I>(&self, lines: I, mode: SearchMode) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        match &self.queue {
            Some(queue) => {
                for line in lines {
                    let inner = Arc::clone(&self.inner);
                    queue.submit(move || {
                        inner.process(&line, mode);
                        Ok(())
                    })?;
                }
                queue.await_idle();
            }
            None => {
                for line in lines {
                    self.inner.process(&line, mode);
                }
            }
        }
        Ok(())
    }

    /// Processes a newline-delimited query file.
    pub fn process_file(&self, path: &Path, mode: SearchMode) -> Result<()> {
        let reader = BufReader::new(File::open(path)?);
        let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
        tracing::info!("Processing {} queries from {}", lines.len(), path.display());
        self.process_lines(lines, mode)
    }

    /// Cached results for `query`, taken either as a key from `queries` or as a raw
    /// line to canonicalize. Stemming is not idempotent, so a key is looked up as-is
    /// first. Empty if never processed.
    pub fn results(&self, query: &str) -> Vec<SearchResult> {
        let cache = &self.inner.cache;
        cache
            .get(query)
            .or_else(|| cache.get(&self.canonicalize(query)))
            .unwrap_or_default()
    }

    /// Canonical queries answered so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.inner.cache.keys()
    }

    pub fn num_queries(&self) -> usize {
        self.inner.cache.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Writes `{query: [{"count", "score", "where"}, ...]}` ordered by query.
    pub fn write_results(&self, path: &Path) -> Result<()> {
        json_writer::write_json(&self.inner.cache.snapshot(), path)
    }
}
