//! Errors surfaced at the HTTP boundary, rendered as plain-text bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::validate::Rejection;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request body could not be decoded. Reported as 500 for
    /// compatibility with existing clients.
    #[error("{0}")]
    Decode(String),

    /// The chain refused the block built from the request.
    #[error("block rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Decode(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Rejected(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
