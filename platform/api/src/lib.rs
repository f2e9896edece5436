use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared HTTP result type.
pub type ApiResult<T> = Result<T, HttpError>;

/// The closed set of failures an HTTP surface reports to clients.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    /// Attach the request path the failure occurred on.
    pub fn at(self, path: impl Into<String>) -> HttpError {
        HttpError {
            error: self,
            path: path.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

/// Body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            path: path.into(),
        }
    }
}

/// An [`ApiError`] bound to the request path it answers.
#[derive(Debug, Error, Clone)]
#[error("{error} ({path})")]
pub struct HttpError {
    pub error: ApiError,
    pub path: String,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        self.error.status()
    }

    pub fn body(&self) -> ErrorResponse {
        ErrorResponse::new(self.status(), self.error.to_string(), self.path.clone())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self.error {
            tracing::error!(path = %self.path, error = ?source, "request failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}
