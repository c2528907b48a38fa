//! Authenticated request gateway.
//!
//! Every backend call goes through [`Gateway::send`]. The gateway attaches
//! the stored session token, and when the server answers with the
//! "unauthenticated" envelope code it logs in again and replays the
//! original request. A logical call is sent at most twice.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, AuthExchange, LoginProvider, Session};
use crate::config::Config;
use crate::notify::{Notifier, NETWORK_FAILURE_MESSAGE, REQUEST_FAILURE_MESSAGE};

use super::envelope::Envelope;
use super::request::{Method, PendingRequest};
use super::ApiError;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "token";

/// Server message for a request made without any session. Not worth showing
/// once a fresh login has already failed.
const NOT_LOGGED_IN_MESSAGE: &str = "用户未登录";

/// Which send of a logical call this is. Only the initial send may trigger
/// re-authentication, so a call is never sent more than twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Replay,
}

impl Attempt {
    fn may_reauthenticate(self) -> bool {
        matches!(self, Attempt::Initial)
    }

    fn as_str(self) -> &'static str {
        match self {
            Attempt::Initial => "initial",
            Attempt::Replay => "replay",
        }
    }
}

/// Outcome of a single send that did not succeed.
enum Failure {
    /// Session expired; internal only, the caller never sees it.
    AuthExpired(ApiError),
    Terminal(ApiError),
}

/// Clone is cheap - reqwest::Client and the capabilities are shared.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    session: Session,
    login: Arc<dyn LoginProvider>,
    exchange: AuthExchange,
    notifier: Arc<dyn Notifier>,
}

impl Gateway {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        session: Session,
        login: Arc<dyn LoginProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let base_url = base_url.into();
        let exchange = AuthExchange::new(client.clone(), base_url.clone());
        Self {
            client,
            base_url,
            session,
            login,
            exchange,
            notifier,
        }
    }

    /// Build the HTTP client from configuration. Without a configured
    /// timeout reqwest's default applies.
    pub fn from_config(
        config: &Config,
        session: Session,
        login: Arc<dyn LoginProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self::new(client, config.base_url.clone(), session, login, notifier))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and return the success envelope.
    pub async fn send(&self, request: &PendingRequest) -> Result<Envelope, ApiError> {
        let original = match self.attempt(request, Attempt::Initial).await {
            Ok(envelope) => return Ok(envelope),
            Err(Failure::Terminal(e)) => return Err(e),
            Err(Failure::AuthExpired(e)) => e,
        };

        debug!(path = %request.path, "Session expired, re-authenticating");
        if let Err(e) = self.establish_session().await {
            // The caller gets the original error, not the login failure.
            warn!(path = %request.path, error = %e, "Re-authentication failed");
            self.notify_failure(&original);
            return Err(original);
        }

        match self.attempt(request, Attempt::Replay).await {
            Ok(envelope) => Ok(envelope),
            Err(Failure::Terminal(e)) | Err(Failure::AuthExpired(e)) => Err(e),
        }
    }

    /// Send a request and deserialize the envelope's `data`.
    pub async fn send_data<T: DeserializeOwned>(
        &self,
        request: &PendingRequest,
    ) -> Result<T, ApiError> {
        self.send(request).await?.into_data()
    }

    /// Obtain a fresh login code, exchange it with the cached profile and
    /// persist the new token. Nothing is stored on failure.
    pub async fn establish_session(&self) -> Result<String, AuthError> {
        let code = self.login.login_code().await?;
        let profile = self.session.profile();
        let token = self.exchange.exchange(&code, profile.as_ref()).await?;
        self.session
            .set_token(&token)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        info!("Session established");
        Ok(token)
    }

    async fn attempt(&self, request: &PendingRequest, attempt: Attempt) -> Result<Envelope, Failure> {
        debug!(
            method = ?request.method,
            path = %request.path,
            attempt = attempt.as_str(),
            "Sending request"
        );

        let envelope = match self.dispatch(request).await {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(path = %request.path, error = %e, "Request failed");
                self.notify_failure(&e);
                return Err(Failure::Terminal(e));
            }
        };

        if envelope.is_success() {
            return Ok(envelope);
        }

        let error = ApiError::from_envelope(envelope);
        if error.is_unauthenticated() && attempt.may_reauthenticate() {
            return Err(Failure::AuthExpired(error));
        }

        debug!(path = %request.path, code = ?error.code(), "Request rejected");
        self.notify_failure(&error);
        Err(Failure::Terminal(error))
    }

    async fn dispatch(&self, request: &PendingRequest) -> Result<Envelope, ApiError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), request.path);
        let headers = self.build_headers(request)?;

        let builder = self
            .client
            .request(request.method.as_reqwest(), &url)
            .headers(headers);
        let builder = match request.method {
            Method::Get => builder.query(&request.query_pairs()?),
            _ => builder.body(request.json_body()?),
        };

        let response = builder.send().await.map_err(ApiError::from_send)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Malformed envelope from {}: {}", request.path, e)))
    }

    /// Default content type, then caller headers, then the session token.
    fn build_headers(&self, request: &PendingRequest) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::InvalidRequest(format!("Bad header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::InvalidRequest(format!("Bad header value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        if let Some(token) = self.session.token() {
            let value = HeaderValue::from_str(&token)
                .map_err(|_| ApiError::InvalidRequest("Stored token is not a valid header value".to_string()))?;
            headers.insert(HeaderName::from_static(TOKEN_HEADER), value);
        }

        Ok(headers)
    }

    fn notify_failure(&self, error: &ApiError) {
        match error {
            ApiError::Network(_) => self.notifier.notify(NETWORK_FAILURE_MESSAGE),
            ApiError::HttpStatus { .. } => self.notifier.notify(REQUEST_FAILURE_MESSAGE),
            ApiError::Api {
                code,
                message: Some(message),
                ..
            } => {
                let silent = error.is_unauthenticated() && message == NOT_LOGGED_IN_MESSAGE;
                if !silent && !message.is_empty() {
                    debug!(code = code, "Showing server message");
                    self.notifier.notify(message);
                }
            }
            _ => {}
        }
    }
}
