//! Mapping of handler failures to HTTP responses.
//!
//! | Variant          | Status | Body                         |
//! |------------------|--------|------------------------------|
//! | `InvalidRequest` | 400    | plain-text message           |
//! | `NotFound`       | 404    | plain-text message           |
//! | `PayloadTooLarge`| 413    | `Payload Too Large`          |
//! | `Fault`          | 500    | `Internal Server Error`      |

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::users::StoreError;

pub const INVALID_BODY: &str = "Invalid request body";
pub const JOKE_NOT_FOUND: &str = "Joke not found!";
pub const INVALID_AGE: &str = "Invalid age query parameter";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed client input.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Payload Too Large")]
    PayloadTooLarge,

    /// Datastore failure. Details are logged, never sent to the client.
    #[error(transparent)]
    Fault(#[from] StoreError),
}

impl ApiError {
    pub fn invalid_body() -> Self {
        Self::InvalidRequest(INVALID_BODY.to_string())
    }

    pub fn joke_not_found() -> Self {
        Self::NotFound(JOKE_NOT_FOUND.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected query string");
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::InvalidRequest(message) | Self::NotFound(message) => message,
            Self::PayloadTooLarge => "Payload Too Large".to_string(),
            Self::Fault(e) => {
                tracing::error!(error = %e, "User store operation failed");
                "Internal Server Error".to_string()
            }
        };
        (status, body).into_response()
    }
}
