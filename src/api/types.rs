use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters for add and update
#[derive(Debug, Clone, Deserialize)]
pub struct IndexParams {
    /// Name of the document field to tokenize
    pub key_field: String,
}

/// Response after storing a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub id: String,
}

/// Query parameters for search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Space-separated query terms; all must match (AND semantics)
    pub q: String,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Value>,
    pub total_hits: u64,
    pub took_ms: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
