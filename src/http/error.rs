//! JSON error envelope returned by every failing route.

use crate::review::{
    domain::ReviewDomainError,
    services::{ErrorKind, ReviewServiceError},
};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body of an error response: `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetail,
}

/// Machine-readable code and human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code such as `NOT_FOUND`.
    pub code: String,
    /// Description of the failure.
    pub message: String,
}

/// Error returned by HTTP handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Builds a `400 BAD_REQUEST` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: ErrorKind::BadRequest.code(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::TeamExists | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::PullRequestExists
        | ErrorKind::PullRequestMerged
        | ErrorKind::NotAssigned
        | ErrorKind::NoCandidate => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ReviewServiceError> for ApiError {
    fn from(err: ReviewServiceError) -> Self {
        let kind = err.kind();
        let message = if kind == ErrorKind::InternalError {
            error!(error = %err, "request failed");
            INTERNAL_ERROR_MESSAGE.to_owned()
        } else {
            err.to_string()
        };
        Self {
            status: status_for(kind),
            code: kind.code(),
            message,
        }
    }
}

impl From<ReviewDomainError> for ApiError {
    fn from(err: ReviewDomainError) -> Self {
        ReviewServiceError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: ErrorDetail {
                    code: self.code.to_owned(),
                    message: self.message,
                },
            }),
        )
            .into_response()
    }
}
