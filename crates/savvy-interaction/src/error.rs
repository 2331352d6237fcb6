//! Errors raised by individual resolver tiers.
//!
//! None of these reach the controller: the resolver catches each one,
//! logs it, and moves on to the next tier.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResponderError {
    /// Required configuration (endpoint, credential) is absent.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body could not be understood.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The response contained no reply text.
    #[error("Responder returned no reply text")]
    EmptyReply,

    /// The system prompt could not be rendered.
    #[error("Prompt rendering failed: {0}")]
    Prompt(String),

    /// The tier did not answer within its time budget.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The turn was superseded while this tier was in flight.
    #[error("Cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ResponderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Maps a non-success HTTP response into [`ResponderError::Http`].
///
/// Google-style `{"error": {"status", "message"}}` bodies are unwrapped;
/// anything else is kept verbatim.
pub(crate) fn map_http_error(status: StatusCode, body: String) -> ResponderError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    ResponderError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Turns a failed response into an error, reading its body for context.
pub(crate) async fn error_from_response(response: reqwest::Response) -> ResponderError {
    let status = response.status();
    let body_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    map_http_error(status, body_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_error_body_is_unwrapped() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        match map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string()) {
            ResponderError::Http { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "RESOURCE_EXHAUSTED: Quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plain_body_is_kept() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "nope".to_string());
        assert_eq!(err.to_string(), "HTTP 400: nope");
    }
}
