use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{catalog::CatalogError, recommend::RecommendError};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A lookup that matched nothing, reported under the `message` key
    #[error("{0}")]
    NoMatches(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Credential, duplicate-account and empty brand lookups answer with a
        // `message` key, everything else with `error`.
        let (status, key, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "error", msg),
            AppError::NoMatches(msg) => (StatusCode::NOT_FOUND, "message", msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "error", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "message", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "message", msg),
            AppError::Database(_) | AppError::Catalog(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "error", self.to_string())
            }
        };

        let body = Json(json!({ key: message }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
