use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::storage::PersistenceError;
use crate::submission::Rejection;
use crate::submission::schema::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Storage failure: {0}")]
    Persistence(PersistenceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidJson(detail) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "invalid_json", "detail": detail }),
            ),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "validation_error", "detail": errors.0 }),
            ),
            AppError::Persistence(err) => {
                tracing::error!("Storage error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "storage_error", "detail": "submission was not stored" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Validation(errors) => AppError::Validation(errors),
            Rejection::Persistence(err) => AppError::Persistence(err),
        }
    }
}
