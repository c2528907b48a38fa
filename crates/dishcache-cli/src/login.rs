use std::sync::Mutex;

use async_trait::async_trait;
use dishcache_core::auth::{AuthError, LoginProvider};
use tracing::debug;

/// Login codes come from `--login-code` once, then from a hidden prompt.
pub struct PromptLogin {
    preset: Mutex<Option<String>>,
}

impl PromptLogin {
    pub fn new(preset: Option<String>) -> Self {
        let preset = preset
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());
        Self {
            preset: Mutex::new(preset),
        }
    }

    /// The preset code is single-use, like any platform login code.
    fn take_preset(&self) -> Option<String> {
        self.preset.lock().ok().and_then(|mut preset| preset.take())
    }
}

#[async_trait]
impl LoginProvider for PromptLogin {
    async fn login_code(&self) -> Result<String, AuthError> {
        if let Some(code) = self.take_preset() {
            debug!("Using preset login code");
            return Ok(code);
        }

        let code = tokio::task::spawn_blocking(|| rpassword::prompt_password("Login code: "))
            .await
            .map_err(|e| AuthError::CodeUnavailable(e.to_string()))?
            .map_err(|e| AuthError::CodeUnavailable(e.to_string()))?;

        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(AuthError::CodeUnavailable("no code entered".to_string()));
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_preset_code_is_used_once() {
        let login = PromptLogin::new(Some(" abc ".to_string()));
        assert_eq!(login.login_code().await.unwrap(), "abc");
        assert!(login.take_preset().is_none());
    }

    #[test]
    fn test_blank_preset_is_ignored() {
        let login = PromptLogin::new(Some("   ".to_string()));
        assert!(login.take_preset().is_none());
    }
}
