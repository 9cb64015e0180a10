//! crates/blog_client/src/session.rs
//!
//! Per-tab persistent key/value storage.
//!
//! In a browser host the backend is `sessionStorage`; `MemoryBackend` plays
//! that role for tests and the command-line renderer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

pub const USER_KEY: &str = "user";
pub const BLOG_KEY: &str = "blog";
pub const EDITOR_RELOADED_KEY: &str = "editorReloaded";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StorageError(pub String);

/// The primitive operations every storage host offers.
pub trait SessionBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str);

    fn clear(&self);
}

//=========================================================================================
// In-memory backend
//=========================================================================================

#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that refuses writes once the stored values would exceed
    /// `bytes`, the way a full browser store does.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: Mutex::default(),
            quota: Some(bytes),
        }
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items();
        if let Some(quota) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if used + value.len() > quota {
                return Err(StorageError(format!(
                    "quota of {} bytes exceeded while writing '{}'",
                    quota, key
                )));
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items().remove(key);
    }

    fn clear(&self) {
        self.items().clear();
    }
}

//=========================================================================================
// SessionStore
//=========================================================================================

/// Typed access on top of a `SessionBackend`. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set_item(key, value)
    }

    pub fn store_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|e| StorageError(e.to_string()))?;
        self.backend.set_item(key, &encoded)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.backend.get_item(key)
    }

    /// Reads and decodes a JSON value. Corrupt data reads as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.backend.get_item(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable session value '{}': {}", key, e);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) {
        self.backend.remove_item(key);
    }

    pub fn clear(&self) {
        self.backend.clear();
    }
}
