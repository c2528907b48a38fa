//! Response envelope returned by every backend endpoint.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::error::{ApiError, CODE_OK, CODE_UNAUTHENTICATED};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn is_success(&self) -> bool {
        self.code == CODE_OK
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.code == CODE_UNAUTHENTICATED
    }

    /// Deserialize `data`. A missing or null `data` is read as JSON null so
    /// that `Option<T>` and `()` targets work.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let data = self.data.unwrap_or(Value::Null);
        serde_json::from_value(data)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response data: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_envelope() {
        let env: Envelope = serde_json::from_str(r#"{"code":401}"#).unwrap();
        assert!(env.is_unauthenticated());
        assert!(env.message.is_none());
        assert!(env.data.is_none());
    }

    #[test]
    fn test_into_data_null_as_option() {
        let env: Envelope = serde_json::from_str(r#"{"code":200,"data":null}"#).unwrap();
        let data: Option<Vec<i64>> = env.into_data().unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn test_into_data_type_mismatch() {
        let env: Envelope = serde_json::from_str(r#"{"code":200,"data":"text"}"#).unwrap();
        let err = env.into_data::<Vec<i64>>().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
