//! API Error Types
//!
//! Every handler failure maps to a 500 with a fixed plain-text message.
//! The underlying detail is logged server-side and never sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::DbError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// The query file could not be read
    #[error("Query store unavailable: {0}")]
    QueryStore(#[source] std::io::Error),

    /// Running a statement failed
    #[error("Database query failed: {0}")]
    Database(#[from] DbError),

    /// The response payload could not be encoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::QueryStore(_) => "QUERY_STORE_UNAVAILABLE",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Message returned to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::QueryStore(_) => "Could not read query file",
            ApiError::Database(_) => "Database query failed",
            ApiError::Serialization(_) => "Failed to serialize response",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %self.code(),
            error_message = %self,
            "API error occurred"
        );

        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
