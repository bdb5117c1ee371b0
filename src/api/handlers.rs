use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::api::types::*;
use crate::error::CuttleError;
use crate::models::Document;

use super::router::AppState;

/// Error wrapper for API handlers
pub enum ApiError {
    Cuttle(CuttleError),
    BadRequest(String),
}

impl From<CuttleError> for ApiError {
    fn from(e: CuttleError) -> Self {
        ApiError::Cuttle(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Cuttle(e) => {
                let (status, error_type) = match &e {
                    CuttleError::DocumentNotFound(_) => {
                        (StatusCode::NOT_FOUND, "document_not_found")
                    }
                    CuttleError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
                    CuttleError::InvalidDocument(_) => {
                        (StatusCode::BAD_REQUEST, "invalid_document")
                    }
                    CuttleError::Serialization(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error")
                    }
                    CuttleError::Encoding(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "encoding_error")
                    }
                    CuttleError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
                    CuttleError::Storage(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
                    }
                    CuttleError::Internal(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                    }
                };
                (status, error_type, e.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        let error_response = ErrorResponse::new(error_type, message);
        (status, Json(error_response)).into_response()
    }
}

fn parse_document(body: Value) -> Result<Document, ApiError> {
    Document::from_value(body)
        .ok_or_else(|| ApiError::BadRequest("document body must be a JSON object".to_string()))
}

/// Create (or overwrite) a document and index its key field
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexParams>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = parse_document(body)?;

    let start = Instant::now();
    let id = state.engine.add_document(doc, &params.key_field)?;
    state.metrics.record_index(start.elapsed().as_secs_f64());

    Ok((StatusCode::CREATED, Json(IndexResponse { id })))
}

/// Get a document by ID
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = state.engine.get_document(&id)?;
    Ok(Json(doc.into_value()))
}

/// Replace a document by ID
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<IndexParams>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = parse_document(body)?;

    let start = Instant::now();
    state.engine.update_document(&id, doc, &params.key_field)?;
    state.metrics.record_update(start.elapsed().as_secs_f64());

    Ok((StatusCode::OK, Json(IndexResponse { id })))
}

/// Delete a document by ID
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.engine.delete_document(&id)?;
    state.metrics.record_delete();
    Ok(StatusCode::NO_CONTENT)
}

/// Conjunctive keyword search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();

    let results = match state.engine.search(&params.q) {
        Ok(results) => results,
        Err(e) => {
            state.metrics.record_search_error();
            return Err(e.into());
        }
    };
    state.metrics.record_search(start.elapsed().as_secs_f64());

    let total_hits = results.len() as u64;
    let response = SearchResponse {
        results: results.into_iter().map(Document::into_value).collect(),
        total_hits,
        took_ms: start.elapsed().as_millis() as u64,
    };

    Ok(Json(response))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    use prometheus::Encoder;

    state.metrics.sync_engine_stats(&state.engine.stats());

    let encoder = prometheus::TextEncoder::new();
    let metric_families = state.metrics.registry().gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        buffer,
    )
}
