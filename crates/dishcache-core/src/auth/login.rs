use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::api::envelope::Envelope;
use crate::models::{LoginResult, UserProfile};

/// Login endpoint, relative to the configured base URL.
pub const LOGIN_PATH: &str = "/app/user/wx-login";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not obtain a login code: {0}")]
    CodeUnavailable(String),

    #[error("Login request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Login rejected (code {code}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected { code: i64, message: Option<String> },

    #[error("Invalid login response: {0}")]
    InvalidResponse(String),

    #[error("Failed to persist session: {0}")]
    Store(String),
}

/// The host platform's one-time login code primitive.
///
/// Each returned code is consumed by exactly one exchange.
#[async_trait]
pub trait LoginProvider: Send + Sync {
    async fn login_code(&self) -> Result<String, AuthError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_info: Option<&'a UserProfile>,
}

/// Raw login round trip. Bypasses the gateway, so a 401 from the login
/// endpoint never starts another re-authentication.
#[derive(Clone)]
pub struct AuthExchange {
    client: Client,
    base_url: String,
}

impl AuthExchange {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Trade a one-time code and the cached profile for a session token.
    pub async fn exchange(
        &self,
        code: &str,
        profile: Option<&UserProfile>,
    ) -> Result<String, AuthError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), LOGIN_PATH);
        let body = LoginRequest {
            code,
            user_info: profile,
        };

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AuthError::InvalidResponse(format!("HTTP status {}", status)));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        if !envelope.is_success() {
            return Err(AuthError::Rejected {
                code: envelope.code,
                message: envelope.message,
            });
        }

        let result: LoginResult = envelope
            .into_data()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        if result.token.is_empty() {
            return Err(AuthError::InvalidResponse("empty token".to_string()));
        }

        debug!(with_profile = profile.is_some(), "Login exchange succeeded");
        Ok(result.token)
    }
}
