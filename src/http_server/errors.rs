//! HTTP error mapping
//!
//! Converts service failures into status codes and `{error, code}` bodies.
//! Not-found responses carry only `{error}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::service::ServiceError;

pub const INVALID_BODY: &str = "FLIGHTDESK_HTTP_INVALID_BODY";

/// Error type returned by every handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body is not valid JSON
    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    /// Lookup target does not exist; the message is sent verbatim
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Filter(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::Surface(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidBody(_) => Some(INVALID_BODY),
            ApiError::NotFound(_) => None,
            ApiError::Service(e) => Some(e.code()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let error = match err {
            ApiError::Service(ServiceError::Filter(e)) => e.message().to_string(),
            other => other.to_string(),
        };
        Self {
            error,
            code: err.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code = ?self.code(), error = %self);
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
