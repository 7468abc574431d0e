//! Custom error types for the dashboard service

use access::AccessError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::CacheError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the dashboard service
///
/// Access denials never show up here; they are redirects.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unknown page
    #[error("Not found")]
    NotFound,

    /// Access-control failure
    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    /// Session backend failure outside the access core
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Access(AccessError::UnknownRole(role)) => {
                (StatusCode::BAD_REQUEST, format!("Unknown role: {}", role))
            }
            ApiError::Access(e) => {
                error!("Access error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Cache(e) => {
                error!("Cache error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
