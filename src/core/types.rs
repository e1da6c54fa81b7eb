use std::cmp::Ordering;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::value::RawValue;

/// Term matching mode for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    #[default]
    Exact,
    /// Every query term is treated as a prefix.
    Partial,
}

impl SearchMode {
    pub fn from_partial(partial: bool) -> Self {
        if partial { SearchMode::Partial } else { SearchMode::Exact }
    }
}

/// One matched location for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub location: String,
    pub count: usize,
    pub score: f64,
}

impl SearchResult {
    pub fn new(location: String, count: usize, total: usize) -> Self {
        let score = if total == 0 { 0.0 } else { count as f64 / total as f64 };
        SearchResult { location, count, score }
    }
}

impl Eq for SearchResult {}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> Ordering {
        other.score.total_cmp(&self.score)
            .then_with(|| other.count.cmp(&self.count))
            .then_with(|| compare_ignore_case(&self.location, &other.location))
    }
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    lower(a).cmp(&lower(b))
}

// Scores are written with a fixed eight digits after the decimal point.
impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let score = RawValue::from_string(format!("{:.8}", self.score))
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        let mut state = serializer.serialize_struct("SearchResult", 3)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("score", &score)?;
        state.serialize_field("where", &self.location)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_score_then_count_then_location() {
        let mut results = vec![
            SearchResult::new("b.txt".to_string(), 1, 4),
            SearchResult::new("A.txt".to_string(), 1, 4),
            SearchResult::new("c.txt".to_string(), 2, 8),
            SearchResult::new("d.txt".to_string(), 1, 2),
        ];
        results.sort();

        let order: Vec<&str> = results.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(order, vec!["d.txt", "c.txt", "A.txt", "b.txt"]);
    }

    #[test]
    fn serializes_fixed_precision_score() {
        let result = SearchResult::new("L".to_string(), 2, 3);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"count":2,"score":0.66666667,"where":"L"}"#);
    }
}
