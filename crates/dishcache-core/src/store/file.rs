use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::debug;

use super::KeyValueStore;

/// One `<key>.json` file per key under a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("Invalid store key: {:?}", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store file: {}", key))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store file: {}", key))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.entry_path(key)?;
        let contents = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write store file: {}", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove store file: {}", key))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.dir).context("Failed to list store directory")? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(&path)?;
            }
        }
        debug!(dir = %self.dir.display(), "Cleared local store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStoreExt;

    #[test]
    fn test_file_store_persists_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().to_path_buf()).unwrap();
        store.save("token", "abc").unwrap();

        let reopened = FileStore::new(tmp.path().to_path_buf()).unwrap();
        let token: Option<String> = reopened.load("token").unwrap();
        assert_eq!(token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_missing_key() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().to_path_buf()).unwrap();
        assert!(store.get("favorites").unwrap().is_none());
        store.remove("favorites").unwrap();
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().to_path_buf()).unwrap();
        assert!(store.get("../secrets").is_err());
        assert!(store.set("", &Value::Null).is_err());
    }

    #[test]
    fn test_file_store_clear_only_removes_json() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().to_path_buf()).unwrap();
        store.save("searchHistory", &["汤"]).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "keep").unwrap();

        store.clear().unwrap();

        assert!(store.get("searchHistory").unwrap().is_none());
        assert!(tmp.path().join("notes.txt").exists());
    }
}
