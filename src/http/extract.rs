//! Request body extraction.
//!
//! Bodies are decoded the way browser-facing JSON APIs commonly do it: a
//! request without a JSON content type, or with an empty body, reads as `{}`
//! so every field is simply absent. Only a JSON body that fails to parse or
//! does not fit the target type is rejected.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
};
use serde::de::DeserializeOwned;

use crate::http::error::ApiError;

const EMPTY_OBJECT: &[u8] = b"{}";

/// JSON body extractor that treats a missing body as an empty object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(request.headers());
        let bytes = Bytes::from_request(request, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "Failed to read request body");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge
            } else {
                ApiError::invalid_body()
            }
        })?;
        decode_body(is_json, &bytes).map(Self)
    }
}

/// `application/json` or any `+json` media type, ignoring parameters.
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

pub fn decode_body<T: DeserializeOwned>(is_json: bool, bytes: &[u8]) -> Result<T, ApiError> {
    let source = if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
        EMPTY_OBJECT
    } else {
        bytes
    };
    serde_json::from_slice(source).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        ApiError::invalid_body()
    })
}
