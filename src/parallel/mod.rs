pub mod task_queue;
pub mod text_indexer;
