//! Error types for studio-ui
//!
//! [`ApiError`] answers JSON routes, [`PageError`] answers HTML routes.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api::ui::layout;

/// JSON API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// studio-common error
    #[error("Common error: {0}")]
    Common(studio_common::Error),
}

impl From<studio_common::Error> for ApiError {
    fn from(err: studio_common::Error) -> Self {
        match err {
            studio_common::Error::NotFound(what) => ApiError::NotFound(what),
            studio_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Common(other),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Common(ref err) => {
                tracing::error!("API request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON_ERROR",
                    err.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for JSON handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTML page error type
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<studio_common::Error> for PageError {
    fn from(err: studio_common::Error) -> Self {
        match err {
            studio_common::Error::NotFound(what) => PageError::NotFound(what),
            studio_common::Error::InvalidInput(msg) => PageError::BadRequest(msg),
            other => PageError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(what) => {
                tracing::debug!("Page not found: {}", what);
                (StatusCode::NOT_FOUND, layout::not_found_html()).into_response()
            }
            PageError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                layout::error_html("Requisição inválida", &msg),
            )
                .into_response(),
            PageError::Internal(msg) => {
                tracing::error!("Page request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    layout::error_html("Erro interno", &msg),
                )
                    .into_response()
            }
        }
    }
}

/// Result type for HTML handlers
pub type PageResult<T> = Result<T, PageError>;
