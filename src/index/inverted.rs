use std::collections::btree_map::Keys;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use std::path::Path;
use crate::core::error::Result;
use crate::core::types::{SearchMode, SearchResult};
use crate::index::search_index::SearchIndex;
use crate::writer::json_writer;

/// Positions of one word at one location, ascending and duplicate free.
pub type Positions = BTreeSet<usize>;

/// Location -> positions for one word.
pub type Postings = BTreeMap<String, Positions>;

/// Inverted index structure
///
/// Maps every word to the locations it appears in and the 1-based positions it
/// occupies there, and tracks how many distinct (word, position) entries each
/// location holds. Words and locations are only ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    index: BTreeMap<String, Postings>,
    counts: BTreeMap<String, usize>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex::default()
    }

    /// Records `word` at `position` in `location`. Returns `false` if the entry was
    /// already present, in which case nothing changes.
    pub fn add_entry(&mut self, word: &str, location: &str, position: usize) -> bool {
        let inserted = self.index
            .entry(word.to_string())
            .or_default()
            .entry(location.to_string())
            .or_default()
            .insert(position);

        if inserted {
            *self.counts.entry(location.to_string()).or_insert(0) += 1;
        }
        inserted
    }

    /// Adds `words` at consecutive positions starting after `start`. Returns the
    /// last position used, so callers can continue numbering across lines.
    pub fn add_batch<I, S>(&mut self, words: I, location: &str, start: usize) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut position = start;
        for word in words {
            position += 1;
            self.add_entry(word.as_ref(), location, position);
        }
        position
    }

    /// Adds every entry of `other`. Counts grow only by the positions that were not
    /// already present here, so overlapping partial indexes never double count.
    pub fn merge_from(&mut self, other: &InvertedIndex) {
        for (word, other_postings) in &other.index {
            let postings = self.index.entry(word.clone()).or_default();

            for (location, other_positions) in other_postings {
                let positions = postings.entry(location.clone()).or_default();
                let before = positions.len();
                positions.extend(other_positions.iter().copied());

                let added = positions.len() - before;
                if added > 0 {
                    *self.counts.entry(location.clone()).or_insert(0) += added;
                }
            }
        }
    }

    pub fn words(&self) -> Keys<'_, String, Postings> {
        self.index.keys()
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.index.get(word)
    }

    /// Locations containing `word`, in order.
    pub fn locations(&self, word: &str) -> impl Iterator<Item = &String> + '_ {
        self.index.get(word).into_iter().flat_map(|postings| postings.keys())
    }

    pub fn positions(&self, word: &str, location: &str) -> Option<&Positions> {
        self.index.get(word).and_then(|postings| postings.get(location))
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Total words recorded at `location`, zero if unknown.
    pub fn count(&self, location: &str) -> usize {
        self.counts.get(location).copied().unwrap_or(0)
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn has_location(&self, word: &str, location: &str) -> bool {
        self.postings(word).is_some_and(|postings| postings.contains_key(location))
    }

    pub fn has_position(&self, word: &str, location: &str, position: usize) -> bool {
        self.positions(word, location).is_some_and(|positions| positions.contains(&position))
    }

    pub fn has_count(&self, location: &str) -> bool {
        self.counts.contains_key(location)
    }

    pub fn num_words(&self) -> usize {
        self.index.len()
    }

    pub fn num_paths(&self, word: &str) -> usize {
        self.postings(word).map_or(0, BTreeMap::len)
    }

    pub fn num_positions(&self, word: &str, location: &str) -> usize {
        self.positions(word, location).map_or(0, BTreeSet::len)
    }

    pub fn num_counts(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Ranked search. `Exact` looks every term up verbatim; `Partial` matches every
    /// indexed word that starts with a term.
    pub fn search(&self, terms: &BTreeSet<String>, mode: SearchMode) -> Vec<SearchResult> {
        let mut matched: BTreeSet<&str> = BTreeSet::new();

        match mode {
            SearchMode::Exact => {
                for term in terms {
                    if let Some((word, _)) = self.index.get_key_value(term.as_str()) {
                        matched.insert(word.as_str());
                    }
                }
            }
            SearchMode::Partial => {
                for prefix in terms {
                    matched.extend(self.prefix_matches(prefix));
                }
            }
        }

        self.rank(matched)
    }

    /// Words starting with `prefix`, walked in order from the prefix until the first
    /// word that no longer shares it.
    fn prefix_matches<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.index
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(word, _)| word.as_str())
            .take_while(move |word| word.starts_with(prefix))
    }

    fn rank<'a>(&'a self, matched: BTreeSet<&'a str>) -> Vec<SearchResult> {
        let mut totals: HashMap<&str, usize> = HashMap::new();
        for word in matched {
            if let Some(postings) = self.index.get(word) {
                for (location, positions) in postings {
                    *totals.entry(location.as_str()).or_insert(0) += positions.len();
                }
            }
        }

        let mut results: Vec<SearchResult> = totals
            .into_iter()
            .map(|(location, count)| SearchResult::new(location.to_string(), count, self.count(location)))
            .collect();
        results.sort();
        results
    }

    /// Writes `{word: {location: [positions...]}}`.
    pub fn write_index(&self, path: &Path) -> Result<()> {
        json_writer::write_json(&self.index, path)
    }

    /// Writes `{location: count}`.
    pub fn write_counts(&self, path: &Path) -> Result<()> {
        json_writer::write_json(&self.counts, path)
    }
}

impl SearchIndex for InvertedIndex {
    fn search(&self, terms: &BTreeSet<String>, mode: SearchMode) -> Vec<SearchResult> {
        InvertedIndex::search(self, terms, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn worked_example() {
        let mut index = InvertedIndex::new();
        let last = index.add_batch(["a", "b", "a"], "L", 0);

        assert_eq!(last, 3);
        assert_eq!(index.count("L"), 3);
        assert_eq!(index.positions("a", "L").unwrap(), &BTreeSet::from([1, 3]));
        assert_eq!(index.positions("b", "L").unwrap(), &BTreeSet::from([2]));
        assert_eq!(index.locations("a").collect::<Vec<_>>(), vec!["L"]);
        assert_eq!(index.locations("zzz").count(), 0);

        let results = index.search(&terms(&["a"]), SearchMode::Exact);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].location, "L");
        assert_eq!(results[0].count, 2);
        assert!((results[0].score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn re_adding_entry_is_idempotent() {
        let mut index = InvertedIndex::new();
        assert!(index.add_entry("word", "a.txt", 4));
        assert!(!index.add_entry("word", "a.txt", 4));

        assert_eq!(index.num_positions("word", "a.txt"), 1);
        assert_eq!(index.num_paths("word"), 1);
        assert_eq!(index.count("a.txt"), 1);
    }

    #[test]
    fn merge_counts_only_new_positions() {
        let mut left = InvertedIndex::new();
        left.add_batch(["x", "y"], "doc", 0);

        let mut right = InvertedIndex::new();
        right.add_batch(["x", "y", "z"], "doc", 0);

        left.merge_from(&right);
        assert_eq!(left.count("doc"), 3);
        assert_eq!(left, right);
    }

    #[test]
    fn partial_search_stops_at_prefix_boundary() {
        let mut index = InvertedIndex::new();
        index.add_batch(["car", "cart", "carbon", "cat", "ca"], "doc", 0);

        let matched: Vec<&str> = index.prefix_matches("car").collect();
        assert_eq!(matched, vec!["car", "carbon", "cart"]);

        let results = index.search(&terms(&["car"]), SearchMode::Partial);
        assert_eq!(results[0].count, 3);
    }

    #[test]
    fn overlapping_prefixes_count_each_word_once() {
        let mut index = InvertedIndex::new();
        index.add_batch(["apple", "apply", "banana"], "doc", 0);

        let results = index.search(&terms(&["ap", "app"]), SearchMode::Partial);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].count, 2);
    }

    #[test]
    fn missing_terms_yield_no_results() {
        let mut index = InvertedIndex::new();
        index.add_batch(["hello"], "doc", 0);
        assert!(index.search(&terms(&["world"]), SearchMode::Exact).is_empty());
        assert!(index.search(&terms(&["hellos"]), SearchMode::Partial).is_empty());
    }
}
