use serde_json::Value;
use thiserror::Error;

use super::envelope::Envelope;

/// Envelope code for a successful call.
pub const CODE_OK: i64 = 200;

/// Envelope code reporting a missing or expired session.
pub const CODE_UNAUTHENTICATED: i64 = 401;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("API error {code}: {}", message.as_deref().unwrap_or("no message"))]
    Api {
        code: i64,
        message: Option<String>,
        data: Option<Value>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = (0..=MAX_ERROR_BODY_LENGTH)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::HttpStatus {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }

    /// Classify a failed send. Errors raised while building the request
    /// (bad base URL, unencodable query) never reached the network.
    pub fn from_send(error: reqwest::Error) -> Self {
        if error.is_builder() {
            ApiError::InvalidRequest(error.to_string())
        } else {
            ApiError::Network(error)
        }
    }

    /// Business-level rejection carried by a non-success envelope.
    pub fn from_envelope(envelope: Envelope) -> Self {
        ApiError::Api {
            code: envelope.code,
            message: envelope.message,
            data: envelope.data,
        }
    }

    /// The envelope code, if the server answered with one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The server-supplied message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.code() == Some(CODE_UNAUTHENTICATED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_body_keeps_short_bodies() {
        assert_eq!(ApiError::truncate_body("oops"), "oops");
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "菜".repeat(400);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated, 1200 total bytes"));
    }

    #[test]
    fn test_from_envelope_keeps_payload() {
        let err = ApiError::from_envelope(Envelope {
            code: 401,
            message: Some("用户未登录".to_string()),
            data: None,
        });
        assert!(err.is_unauthenticated());
        assert_eq!(err.server_message(), Some("用户未登录"));
    }

    #[test]
    fn test_display_without_message() {
        let err = ApiError::from_envelope(Envelope {
            code: 500,
            message: None,
            data: None,
        });
        assert_eq!(err.to_string(), "API error 500: no message");
    }
}
