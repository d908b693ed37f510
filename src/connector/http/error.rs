use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::DomainError;

/// Error returned by HTTP handlers, rendered as a JSON `{ "error": ... }` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {message}")]
    NotFound {
        message: String,
        missing: Option<String>,
    },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }

    /// Attach the missing source label to a not-found error.
    pub fn with_source(self, source: &str) -> Self {
        match self {
            ApiError::NotFound { message, .. } => ApiError::NotFound {
                message,
                missing: Some(source.to_string()),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Generation(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => ApiError::BadRequest(msg),
            DomainError::EmptyStore => ApiError::BadRequest(DomainError::EmptyStore.to_string()),
            DomainError::NotFound(msg) => ApiError::NotFound {
                message: msg,
                missing: None,
            },
            DomainError::AlreadyExists(msg) => ApiError::Conflict(msg),
            DomainError::GenerationError(msg) => ApiError::Generation(msg),
            other => ApiError::internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = match self {
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) | ApiError::Internal(msg) => {
                json!({ "error": msg })
            }
            ApiError::NotFound { message, missing } => match missing {
                Some(source) => json!({ "error": message, "source": source }),
                None => json!({ "error": message }),
            },
            ApiError::Generation(details) => json!({
                "error": "Failed to generate an answer",
                "details": details,
            }),
        };

        (status, Json(body)).into_response()
    }
}
