pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod persistence;
pub mod tokenizer;

pub use api::{create_router, AppState};
pub use config::{IndexSettings, ServerConfig, TokenizerConfig};
pub use engine::{EngineStats, SearchEngine};
pub use error::{CuttleError, Result};
pub use metrics::SearchMetrics;
pub use models::{Document, DocumentId};
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
