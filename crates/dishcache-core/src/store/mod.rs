//! Key-value local storage.
//!
//! The store is the durable home of the session token and the cached user
//! profile, and the fallback system of record for favorites and history
//! when the backend is unreachable. It is an injected capability so the
//! gateway and the app flows can be exercised against `MemoryStore`.
//!
//! Values are JSON documents addressed by a short key (see [`keys`]).

pub mod file;
pub mod memory;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Keys used by this crate.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER_INFO: &str = "userInfo";
    pub const FAVORITES: &str = "favorites";
    pub const SEARCH_HISTORY: &str = "searchHistory";
    pub const VIEW_HISTORY: &str = "viewHistory";
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Typed access on top of [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .with_context(|| format!("Failed to decode stored value: {}", key)),
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to encode value for: {}", key))?;
        self.set(key, &value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
