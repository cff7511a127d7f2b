//! Save/load of lifetime progress
//!
//! Features:
//! - `KeyValueStore` seam over LocalStorage (web), JSON files (native) and memory
//! - Atomic file writes (tmp → rename)
//! - Background writer thread, last write wins
//! - Malformed or missing data falls back to defaults

mod progress;
mod store;

pub use progress::SavedProgress;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
#[cfg(not(target_arch = "wasm32"))]
pub use store::{BackgroundStore, FileStore};
pub use store::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }
}

/// Load and decode `key`. Missing data is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Load `key`, falling back to `T::default()` on missing or bad data
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::info!("No saved data under {key}, starting fresh");
            T::default()
        }
        Err(e) => {
            log::warn!("Ignoring saved data under {key}: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        count: u32,
    }

    #[test]
    fn test_json_roundtrip_through_store() {
        let mut store = MemoryStore::default();
        save_json(&mut store, "sample", &Sample { count: 4 }).unwrap();
        let loaded: Option<Sample> = load_json(&store, "sample").unwrap();
        assert_eq!(loaded, Some(Sample { count: 4 }));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::default();
        let loaded: Option<Sample> = load_json(&store, "nothing").unwrap();
        assert!(loaded.is_none());
        assert_eq!(load_or_default::<Sample>(&store, "nothing"), Sample::default());
    }

    #[test]
    fn test_malformed_falls_back() {
        let mut store = MemoryStore::default();
        store.set("sample", "{not json").unwrap();
        assert!(matches!(
            load_json::<Sample>(&store, "sample"),
            Err(PersistenceError::Json(_))
        ));
        assert_eq!(load_or_default::<Sample>(&store, "sample"), Sample::default());
    }
}
