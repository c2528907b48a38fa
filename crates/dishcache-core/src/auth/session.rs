use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::models::UserProfile;
use crate::store::{keys, KeyValueStore, KeyValueStoreExt};

/// Session state backed by the local store.
///
/// There is no client-side expiry: a token is valid until the server says
/// otherwise. Writes are last-writer-wins.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current token. An unreadable entry counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.store.load::<String>(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.save(keys::TOKEN, token)
    }

    pub fn clear_token(&self) -> Result<()> {
        self.store.remove(keys::TOKEN)
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Cached platform profile. An unreadable entry counts as no profile.
    pub fn profile(&self) -> Option<UserProfile> {
        match self.store.load::<UserProfile>(keys::USER_INFO) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Failed to read cached user profile");
                None
            }
        }
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        self.store.save(keys::USER_INFO, profile)
    }
}
