//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::InsightError;

/// Error returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    /// The request body is missing or malformed.
    BadRequest(String),
    /// The scoring path failed.
    Insight(InsightError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Insight(e @ InsightError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Insight(e) => {
                tracing::error!("Request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: message,
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<InsightError> for ApiError {
    fn from(e: InsightError) -> Self {
        ApiError::Insight(e)
    }
}
