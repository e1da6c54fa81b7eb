use std::fs;
use std::sync::Arc;
use webdex::analysis::analyzer::Analyzer;
use webdex::core::types::SearchMode;
use webdex::index::concurrent::ConcurrentIndex;
use webdex::parallel::task_queue::TaskQueue;
use webdex::parallel::text_indexer::TextIndexer;
use webdex::query::engine::QueryEngine;

const DOCS: [(&str, &str); 3] = [
    ("animals.txt", "The quick brown fox jumps over the lazy dog.\nFoxes are quick."),
    ("birds.text", "Birds fly over the lazy river; a bird sings."),
    ("notes.md", "fox fox fox fox"),
];

fn build() -> (tempfile::TempDir, Arc<ConcurrentIndex>, Arc<Analyzer>, Arc<TaskQueue>) {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    for (name, body) in DOCS {
        fs::write(nested.join(name), body).unwrap();
    }

    let analyzer = Arc::new(Analyzer::standard_english());
    let index = Arc::new(ConcurrentIndex::new());
    let queue = Arc::new(TaskQueue::new(4));
    TextIndexer::new(Arc::clone(&analyzer))
        .index_path_parallel(dir.path(), &index, &queue)
        .unwrap();
    (dir, index, analyzer, queue)
}

#[test]
fn parallel_ingestion_skips_non_text_files() {
    let (dir, index, _, _) = build();
    assert_eq!(index.num_counts(), 2);

    let animals = dir.path().join("nested").join("animals.txt").to_string_lossy().into_owned();
    assert_eq!(index.count(&animals), 12);
    assert_eq!(index.positions("fox", &animals).into_iter().collect::<Vec<_>>(), vec![4, 10]);
}

#[test]
fn threaded_engine_searches_each_canonical_query_once() {
    let (_dir, index, analyzer, queue) = build();
    let engine = QueryEngine::with_queue(index, analyzer, Arc::clone(&queue));

    let mut lines = Vec::new();
    for _ in 0..20 {
        lines.push("lazy fox".to_string());
        lines.push("Fox LAZY lazy".to_string());
        lines.push("bird".to_string());
        lines.push("   ".to_string());
    }
    engine.process_lines(lines, SearchMode::Exact).unwrap();

    assert_eq!(engine.queries(), vec!["bird".to_string(), "fox lazi".to_string()]);
    let stats = engine.cache_stats();
    assert_eq!(stats.miss_count, 2);
    assert_eq!(stats.hit_count, 58);

    let results = engine.results("the lazy foxes");
    assert!(results.is_empty());
    let results = engine.results("foxes lazy");
    assert_eq!(results.len(), 2);
    assert!(results[0].location.ends_with("animals.txt"));
    assert_eq!(results[0].count, 3);
}

#[test]
fn query_file_results_are_exported_in_key_order() {
    let (dir, index, analyzer, queue) = build();
    let engine = QueryEngine::with_queue(index, analyzer, queue);

    let queries = dir.path().join("queries.txt");
    fs::write(&queries, "zebra\nqui\nbir fl\n").unwrap();
    engine.process_file(&queries, SearchMode::Partial).unwrap();

    let out = dir.path().join("results.json");
    engine.write_results(&out).unwrap();
    let json = fs::read_to_string(&out).unwrap();

    let bir = json.find("\"bir fl\"").unwrap();
    let qui = json.find("\"qui\"").unwrap();
    let zebra = json.find("\"zebra\"").unwrap();
    assert!(bir < qui && qui < zebra);

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["zebra"].as_array().unwrap().len(), 0);
    assert_eq!(parsed["qui"][0]["count"], 2);
    assert_eq!(parsed["bir fl"].as_array().unwrap().len(), 1);
}
