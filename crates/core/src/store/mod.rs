//! Key-value preference port used to persist engine state.
//!
//! The engine only needs whole-value reads and writes by string key. Two
//! adapters ship with the crate: an in-memory map and a JSON file.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access preference store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored value for '{key}' has an unexpected shape: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("preference file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Raw value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Typed read with a fallback for absent keys.
pub async fn get_or<T>(
    store: &dyn PreferenceStore,
    key: &str,
    default: T,
) -> Result<T, StoreError>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map_err(|source| StoreError::Decode { key: key.to_string(), source }),
        None => Ok(default),
    }
}

/// Typed write.
pub async fn set_typed<T>(
    store: &dyn PreferenceStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError>
where
    T: Serialize + Sync,
{
    let value = serde_json::to_value(value)
        .map_err(|source| StoreError::Encode { key: key.to_string(), source })?;
    store.set(key, value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
    }

    #[tokio::test]
    async fn test_get_or_returns_default_for_missing_key() {
        let store = MemoryStore::new();
        let got = get_or(&store, "missing", 7u32).await.unwrap();
        assert_eq!(got, 7);
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let store = MemoryStore::new();
        set_typed(&store, "prefs", &Prefs { theme: "dark".into() }).await.unwrap();
        let got: Prefs = get_or(&store, "prefs", Prefs { theme: "light".into() }).await.unwrap();
        assert_eq!(got.theme, "dark");
    }

    #[tokio::test]
    async fn test_get_or_reports_shape_mismatch() {
        let store = MemoryStore::new();
        store.set("prefs", Value::from(3)).await.unwrap();
        let err = get_or(&store, "prefs", Prefs { theme: "x".into() }).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }
}
