use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;

use super::{PreferenceStore, StoreError};

/// Preferences kept as one JSON object on disk, keyed by preference name.
///
/// Every `set` rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.display().to_string(), source }
    }

    async fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(s) if s.trim().is_empty() => Ok(Map::new()),
            Ok(s) => serde_json::from_str(&s).map_err(|source| StoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

#[async_trait]
impl PreferenceStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut all = self.read_all().await?;
        all.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(e))?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(all))
            .map_err(|source| StoreError::Encode { key: key.to_string(), source })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await.map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| self.io_err(e))?;
        tracing::debug!(path = %self.path.display(), key, "preference written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_parent_dirs_and_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/state/prefs.json");
        let store = JsonFileStore::new(&path);

        store.set("a", json!(1)).await.unwrap();
        store.set("b", json!({"x": true})).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap(), Some(json!(1)));
        assert_eq!(reopened.get("b").await.unwrap(), Some(json!({"x": true})));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileStore::new(&path).get("a").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
