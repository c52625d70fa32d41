use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Validation(String),

    /// Every generated reference candidate collided with an existing booking.
    #[error("Failed to save booking")]
    DuplicateReference,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DecisionLocked(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Database(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": e.to_string() }),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            AppError::DuplicateReference => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": self.to_string() }),
            ),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "message": msg }))
            }
            AppError::DecisionLocked(msg) => (
                StatusCode::CONFLICT,
                serde_json::json!({ "success": false, "message": msg }),
            ),
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": e.to_string() }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
