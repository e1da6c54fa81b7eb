pub mod concurrent;
pub mod inverted;
pub mod search_index;
