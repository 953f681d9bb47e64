// src/error.rs
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::i18n::{self, Language};

/// Failures a relay exchange can produce, one variant per distinguishable
/// cause. Remote failures carry whatever context the transport gave us;
/// message bodies stay out of the `Display` text and only surface in logs.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The user message was empty after trimming. Routes handle this locally
    /// with the localized placeholder reply; it never reaches the backend.
    #[error("empty message")]
    EmptyMessage,

    /// The remote service could not be reached (connect failure, timeout or
    /// other transport error).
    #[error("remote service unreachable: {reason}")]
    RemoteUnavailable { reason: String },

    /// The remote service answered with a non-success status.
    #[error("remote service returned HTTP {status}")]
    RemoteError { status: u16, body: String },

    /// The remote reply could not be decoded into a text message.
    #[error("malformed response from remote service: {reason}")]
    MalformedResponse { reason: String },
}

impl RelayError {
    /// Stable tag used in HTTP error bodies and outcome metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::EmptyMessage => "empty_message",
            RelayError::RemoteUnavailable { .. } => "remote_unavailable",
            RelayError::RemoteError { .. } => "remote_error",
            RelayError::MalformedResponse { .. } => "malformed_response",
        }
    }
}

/// A relay failure bound to the locale of the request that produced it, so
/// the HTTP body carries the translated error template.
#[derive(Debug)]
pub struct ApiError {
    pub error: RelayError,
    pub language: Language,
}

impl ApiError {
    pub fn new(error: RelayError, language: Language) -> Self {
        Self { error, language }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error {
            RelayError::EmptyMessage => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(kind = self.error.kind(), "request failed: {}", self.error);
        let message = i18n::translations(self.language).format_error(&self.error.to_string());
        let body = Json(serde_json::json!({
            "error": { "kind": self.error.kind(), "message": message }
        }));
        (status, body).into_response()
    }
}
