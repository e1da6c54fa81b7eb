use std::collections::BTreeSet;
use crate::analysis::filters::stemmer::StemmerFilter;
use crate::analysis::tokenizer::{WordTokenizer, Words};

/// Text analysis pipeline: tokenize, then stem.
///
/// One analyzer is built at startup and shared (`Arc<Analyzer>`) with every
/// component that turns text into index terms.
#[derive(Debug)]
pub struct Analyzer {
    pub tokenizer: WordTokenizer,
    pub stemmer: StemmerFilter,
    pub name: String,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: WordTokenizer, stemmer: StemmerFilter) -> Self {
        Analyzer { tokenizer, stemmer, name }
    }

    /// Create standard analyzer for English
    pub fn standard_english() -> Self {
        Analyzer::new(
            "standard_english".to_string(),
            WordTokenizer,
            StemmerFilter::english(),
        )
    }

    /// Lazily yields the stem of every word in `text`, in order.
    pub fn stems<'a>(&'a self, text: &'a str) -> Stems<'a> {
        Stems {
            words: self.tokenizer.tokenize(text),
            stemmer: &self.stemmer,
        }
    }

    pub fn unique_stems(&self, text: &str) -> BTreeSet<String> {
        self.stems(text).collect()
    }

    /// Canonical form of a query line: unique stems, sorted, space separated.
    pub fn canonicalize(&self, line: &str) -> String {
        join_terms(&self.unique_stems(line))
    }
}

pub fn join_terms(terms: &BTreeSet<String>) -> String {
    terms.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone)]
pub struct Stems<'a> {
    words: Words<'a>,
    stemmer: &'a StemmerFilter,
}

impl Iterator for Stems<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.words.next().map(|word| self.stemmer.stem(&word))
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::standard_english()
    }
}
