//! Durable key-value snapshot store behind the cart manager.
//!
//! The store is the per-origin browser storage analog: flat string keys,
//! string values, plus a change feed so other cart-manager instances sharing
//! the store can reconcile. Writers publish an event after every successful
//! `put`/`remove`; subscribers decide what the change means.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::broadcast;

/// Buffered change events per subscriber before lagging kicks in.
const CHANGE_FEED_CAPACITY: usize = 32;

/// Filename of the single JSON object the [`FileStore`] keeps.
const STORE_FILE: &str = "cart-store.json";

/// Errors from the snapshot store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Encoding the backing file failed.
    #[error("store encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A change notification: which key changed and what it holds now.
///
/// `new_value` is `None` when the key was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: String,
    pub new_value: Option<String>,
}

/// Flat string-keyed durable storage with a change feed.
pub trait SnapshotStore: Send + Sync {
    /// Read a key.
    ///
    /// # Errors
    ///
    /// [`StoreError`] when the backing medium fails.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// [`StoreError`] when the backing medium fails.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// [`StoreError`] when the backing medium fails.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// In-memory store for tests and single-process reconciliation scenarios.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    feed: broadcast::Sender<StoreEvent>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            entries: Mutex::new(HashMap::new()),
            feed,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            entries.insert(key.to_owned(), value.to_owned());
        }
        // No receivers is fine: nobody is reconciling.
        let _ = self.feed.send(StoreEvent {
            key: key.to_owned(),
            new_value: Some(value.to_owned()),
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            entries.remove(key);
        }
        let _ = self.feed.send(StoreEvent {
            key: key.to_owned(),
            new_value: None,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.feed.subscribe()
    }
}

/// File-backed store: one JSON object file under the configured data
/// directory, written through on every change.
///
/// A corrupt file is logged and treated as empty on open; there is no
/// repair path.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
    feed: broadcast::Sender<StoreEvent>,
}

impl FileStore {
    /// Open (or create) the store under `data_dir`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] when the directory cannot be created or the store
    /// file cannot be read. A present-but-unparseable file is not an error.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE);

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Discarding corrupt cart store file");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        let (feed, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Ok(Self {
            path,
            entries: Mutex::new(entries),
            feed,
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, encoded)?;
        Ok(())
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            entries.insert(key.to_owned(), value.to_owned());
            self.persist(&entries)?;
        }
        let _ = self.feed.send(StoreEvent {
            key: key.to_owned(),
            new_value: Some(value.to_owned()),
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            entries.remove(key);
            self.persist(&entries)?;
        }
        let _ = self.feed.send(StoreEvent {
            key: key.to_owned(),
            new_value: None,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("greenhollow-store-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart").unwrap(), None);

        store.put("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));

        store.remove("cart").unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_memory_store_publishes_changes() {
        let store = MemoryStore::new();
        let mut feed = store.subscribe();

        store.put("cart", "[1]").unwrap();
        store.remove("cart").unwrap();

        assert_eq!(
            feed.try_recv().unwrap(),
            StoreEvent {
                key: "cart".to_owned(),
                new_value: Some("[1]".to_owned()),
            }
        );
        assert_eq!(
            feed.try_recv().unwrap(),
            StoreEvent {
                key: "cart".to_owned(),
                new_value: None,
            }
        );
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = temp_dir();

        let store = FileStore::open(&dir).unwrap();
        store.put("cart", "snapshot").unwrap();
        drop(store);

        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("snapshot"));
    }

    #[test]
    fn test_file_store_discards_corrupt_file() {
        let dir = temp_dir();
        std::fs::write(dir.join(STORE_FILE), "{not json").unwrap();

        let store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_succeeds() {
        let store = MemoryStore::new();
        store.remove("ghost").unwrap();
    }
}
