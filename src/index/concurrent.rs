use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use parking_lot::RwLock;
use crate::core::error::Result;
use crate::core::types::{SearchMode, SearchResult};
use crate::index::inverted::{InvertedIndex, Positions};
use crate::index::search_index::SearchIndex;

/// Inverted index shared between ingestion and query threads.
///
/// Any number of readers, or exactly one writer. Mutators hold the write lock for the
/// whole call; readers copy what they need out before the read lock is released, so
/// nothing borrowed from the inner index ever escapes.
#[derive(Debug, Default)]
pub struct ConcurrentIndex {
    inner: RwLock<InvertedIndex>,
}

impl ConcurrentIndex {
    pub fn new() -> Self {
        ConcurrentIndex::default()
    }

    pub fn from_index(index: InvertedIndex) -> Self {
        ConcurrentIndex { inner: RwLock::new(index) }
    }

    pub fn add_entry(&self, word: &str, location: &str, position: usize) -> bool {
        self.inner.write().add_entry(word, location, position)
    }

    pub fn add_batch<I, S>(&self, words: I, location: &str, start: usize) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.write().add_batch(words, location, start)
    }

    pub fn merge_from(&self, other: &InvertedIndex) {
        self.inner.write().merge_from(other);
    }

    /// Point-in-time copy of the whole index.
    pub fn snapshot(&self) -> InvertedIndex {
        self.inner.read().clone()
    }

    pub fn words(&self) -> Vec<String> {
        self.inner.read().words().cloned().collect()
    }

    pub fn locations(&self, word: &str) -> Vec<String> {
        self.inner.read().locations(word).cloned().collect()
    }

    pub fn positions(&self, word: &str, location: &str) -> Positions {
        self.inner.read()
            .positions(word, location)
            .cloned()
            .unwrap_or_default()
    }

    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.inner.read().counts().clone()
    }

    pub fn count(&self, location: &str) -> usize {
        self.inner.read().count(location)
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.inner.read().has_word(word)
    }

    pub fn has_location(&self, word: &str, location: &str) -> bool {
        self.inner.read().has_location(word, location)
    }

    pub fn has_position(&self, word: &str, location: &str, position: usize) -> bool {
        self.inner.read().has_position(word, location, position)
    }

    pub fn has_count(&self, location: &str) -> bool {
        self.inner.read().has_count(location)
    }

    pub fn num_words(&self) -> usize {
        self.inner.read().num_words()
    }

    pub fn num_paths(&self, word: &str) -> usize {
        self.inner.read().num_paths(word)
    }

    pub fn num_positions(&self, word: &str, location: &str) -> usize {
        self.inner.read().num_positions(word, location)
    }

    pub fn num_counts(&self) -> usize {
        self.inner.read().num_counts()
    }

    pub fn search(&self, terms: &BTreeSet<String>, mode: SearchMode) -> Vec<SearchResult> {
        self.inner.read().search(terms, mode)
    }

    pub fn write_index(&self, path: &Path) -> Result<()> {
        self.inner.read().write_index(path)
    }

    pub fn write_counts(&self, path: &Path) -> Result<()> {
        self.inner.read().write_counts(path)
    }
}

impl SearchIndex for ConcurrentIndex {
    fn search(&self, terms: &BTreeSet<String>, mode: SearchMode) -> Vec<SearchResult> {
        ConcurrentIndex::search(self, terms, mode)
    }
}
