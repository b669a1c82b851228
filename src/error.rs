use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum VaultError {
    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("not authenticated")]
    NotAuthenticated,
}

impl From<argon2::password_hash::Error> for VaultError {
    fn from(e: argon2::password_hash::Error) -> Self {
        VaultError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            VaultError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            VaultError::Json(_) | VaultError::Database(_) | VaultError::PasswordHash(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
