use std::collections::BTreeSet;
use crate::core::types::{SearchMode, SearchResult};

/// Read side of an index as seen by the query engine.
pub trait SearchIndex: Send + Sync {
    /// Ranked results for already-stemmed `terms`.
    fn search(&self, terms: &BTreeSet<String>, mode: SearchMode) -> Vec<SearchResult>;
}
