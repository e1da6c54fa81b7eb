use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use crate::core::types::SearchResult;

type ResultCell = Arc<OnceLock<Vec<SearchResult>>>;

/// Query cache for avoiding recomputation
///
/// Keyed by canonical query. Entries are written once and never replaced. The map
/// lock is held only to find or create a key's cell; the search itself runs inside
/// the cell's one-time initializer, so distinct queries compute in parallel while
/// concurrent requests for the same query wait for a single computation.
pub struct QueryCache {
    pub cache: Mutex<BTreeMap<String, ResultCell>>,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
}

impl QueryCache {
    pub fn new() -> Self {
        QueryCache {
            cache: Mutex::new(BTreeMap::new()),
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        }
    }

    /// Runs `compute` only if `key` has never been computed. Returns whether it ran.
    pub fn get_or_compute(&self, key: &str, compute: impl FnOnce() -> Vec<SearchResult>) -> bool {
        let cell = {
            let mut cache = self.cache.lock();
            let existing = cache.get(key).cloned();
            existing.unwrap_or_else(|| Arc::clone(cache.entry(key.to_string()).or_default()))
        };

        let mut computed = false;
        cell.get_or_init(|| {
            computed = true;
            compute()
        });

        if computed {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
        }
        computed
    }

    pub fn get(&self, key: &str) -> Option<Vec<SearchResult>> {
        let cell = self.cache.lock().get(key).cloned()?;
        cell.get().cloned()
    }

    /// Completed entries, ordered by key.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<SearchResult>> {
        self.cache
            .lock()
            .iter()
            .filter_map(|(key, cell)| cell.get().map(|results| (key.clone(), results.clone())))
            .collect()
    }

    pub fn keys(&self) -> Vec<String> {
        self.cache
            .lock()
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cache.lock().values().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.len(),
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        QueryCache::new()
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn computes_each_key_once() {
        let cache = Arc::new(QueryCache::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let runs = Arc::clone(&runs);
                thread::spawn(move || {
                    cache.get_or_compute("same key", || {
                        runs.fetch_add(1, Ordering::SeqCst);
                        vec![SearchResult::new("L".to_string(), 1, 2)]
                    });
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        let stats = cache.stats();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 15);
        assert_eq!(stats.size, 1);
        assert_eq!(cache.get("same key").unwrap().len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let cache = QueryCache::new();
        assert!(cache.get("nothing").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hit_rate(), 0.0);
    }
}
