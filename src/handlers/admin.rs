use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::services::auth::{self, AuthError};
use crate::state::AppState;

// POST /admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let result = {
        let db = state.db.lock().unwrap();
        auth::verify_login(&db, &body.username, &body.password)
    };

    match result {
        Ok(()) => Json(serde_json::json!({
            "success": true,
            "message": "Login successful",
        }))
        .into_response(),
        Err(AuthError::Internal(e)) => {
            tracing::error!(error = %e, "login check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Server Error" })),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "success": false, "message": e.to_string() })),
        )
            .into_response(),
    }
}

// POST /admin/reset-password
#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub email: String,
    #[serde(rename = "securityAnswer")]
    pub security_answer: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Response {
    let result = {
        let db = state.db.lock().unwrap();
        auth::reset_password(
            &db,
            &body.username,
            &body.email,
            &body.security_answer,
            &body.new_password,
        )
    };

    match result {
        Ok(()) => {
            tracing::info!("admin password updated");
            Json(serde_json::json!({
                "success": true,
                "message": "Password Updated Successfully",
            }))
            .into_response()
        }
        Err(AuthError::Internal(e)) => {
            tracing::error!(error = %e, "password reset failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Server Error" })),
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "success": false, "message": e.to_string() })),
        )
            .into_response(),
    }
}
