pub mod analyzer;
pub mod filters;
pub mod tokenizer;
