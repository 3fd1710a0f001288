use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::storage::StorageError;

/// Message shown when a password matches neither secret.
pub const WRONG_PASSWORD: &str = "كلمة المرور غير صحيحة";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage read failed: {0}")]
    StorageRead(StorageError),

    #[error("Storage write failed: {0}")]
    StorageWrite(StorageError),

    #[error("{}", WRONG_PASSWORD)]
    Authentication,

    #[error("Login required")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Import rejected: {0}")]
    ImportValidation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No action is waiting for confirmation")]
    NoPendingAction,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication | AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::ImportValidation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoPendingAction => StatusCode::CONFLICT,
            AppError::StorageRead(_)
            | AppError::StorageWrite(_)
            | AppError::Config(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::StorageRead(_) => "storage_read",
            AppError::StorageWrite(_) => "storage_write",
            AppError::Authentication => "authentication",
            AppError::NotAuthenticated => "not_authenticated",
            AppError::Validation(_) => "validation",
            AppError::ImportValidation(_) => "import_validation",
            AppError::NotFound(_) => "not_found",
            AppError::NoPendingAction => "no_pending_action",
            AppError::Config(_) => "config",
            AppError::Serialization(_) => "serialization",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage details stay in the log.
        let message = match &self {
            AppError::StorageRead(_) | AppError::StorageWrite(_) => {
                log::error!("{}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({
            "error": self.kind(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}
