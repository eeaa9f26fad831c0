use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use tocshelf_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Error processing PDF file")]
    Processing,
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Processing => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(_) => ApiError::NotFound("Document not found".to_string()),
            CoreError::InvalidInput(msg) => ApiError::BadRequest(msg),
            CoreError::Backend(e) => {
                tracing::warn!(error = %e, "PDF processing failed");
                ApiError::Processing
            }
            CoreError::Store(e) => ApiError::Internal(e.to_string()),
            CoreError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}
