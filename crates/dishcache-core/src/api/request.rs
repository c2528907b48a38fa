//! Replayable descriptor of one outbound API call.

use serde::Serialize;
use serde_json::{Map, Value};

use super::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An immutable request description. The gateway only ever borrows it, so
/// the same value is what gets replayed after re-authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a body. For `GET` it is sent as query parameters.
    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Query pairs for a `GET`. Null fields are dropped; strings are sent
    /// as-is and other scalars in their JSON form.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, ApiError> {
        let fields = match &self.body {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Object(fields)) => fields,
            Some(other) => {
                return Err(ApiError::InvalidRequest(format!(
                    "GET parameters must be an object, got {}",
                    other
                )))
            }
        };

        Ok(fields
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect())
    }

    /// JSON body for non-`GET` methods; an absent body is sent as `{}`.
    pub fn json_body(&self) -> Result<Vec<u8>, ApiError> {
        let empty = Value::Object(Map::new());
        let body = self.body.as_ref().unwrap_or(&empty);
        serde_json::to_vec(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to encode body: {}", e)))
    }
}
