//! Engine orchestrating document storage, the token index and the read cache.

mod search_engine;

pub use search_engine::{EngineStats, SearchEngine};
