//! Client Storage
//!
//! String key/value storage with the same shape as browser `localStorage`.
//! The browser crate backs it with `window.localStorage`; natively it is a
//! JSON file in the data directory.

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

/// Client storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be read or written as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage backend is not available
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String key/value storage
pub trait ClientStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&self, key: &str) -> StoreResult<()>;
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given entries
    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RefCell::new(
                items
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl ClientStore for MemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file::FileStore;

#[cfg(feature = "native")]
mod file {
    use std::path::{Path, PathBuf};

    use serde_json::{Map, Value};

    use super::{ClientStore, StoreResult};

    /// Storage file name inside the data directory
    const STORAGE_FILE: &str = "storage.json";

    /// Storage persisted as a JSON object of strings
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        /// Store kept in `storage.json` under the given directory
        pub fn new(data_dir: impl AsRef<Path>) -> Self {
            Self {
                path: data_dir.as_ref().join(STORAGE_FILE),
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read(&self) -> StoreResult<Map<String, Value>> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) if content.trim().is_empty() => Ok(Map::new()),
                Ok(content) => Ok(serde_json::from_str(&content)?),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
                Err(e) => Err(e.into()),
            }
        }

        fn write(&self, items: &Map<String, Value>) -> StoreResult<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(items)?;

            // Replace the file atomically
            let tmp = self.path.with_extension("json.tmp");
            std::fs::write(&tmp, content)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl ClientStore for FileStore {
        fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
            Ok(self.read()?.get(key).map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }))
        }

        fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
            let mut items = self.read()?;
            items.insert(key.to_string(), Value::String(value.to_string()));
            self.write(&items)
        }

        fn remove_item(&self, key: &str) -> StoreResult<()> {
            let mut items = self.read()?;
            if items.remove(key).is_some() {
                self.write(&items)?;
            }
            Ok(())
        }
    }

}
