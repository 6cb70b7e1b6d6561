//! Saved selections and last form choices, kept in a key-value store.
//!
//! The store is read-modify-write with no locking. Only one tab is expected to
//! write at a time; two tabs saving concurrently can lose an entry.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::selection::Selection;

/// Key of the last chosen house types.
pub const HOUSE_TYPES_KEY: &str = "houseTypes";
/// Key of the last chosen quarters.
pub const QUARTERS_KEY: &str = "quarters";
pub const SAVED_STATISTICS_KEY: &str = "savedStatistics";

/// Minimal string key-value store.
pub trait StoragePort {
    fn load(&self, key: &str) -> Result<Option<String>, AppError>;
    fn save(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// `window.localStorage`.
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Result<Self, AppError> {
        let window = web_sys::window().ok_or_else(|| AppError::Storage("No window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| AppError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| AppError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl StoragePort for BrowserStorage {
    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        self.storage
            .get_item(key)
            .map_err(|e| AppError::Storage(format!("{:?}", e)))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| AppError::Storage(format!("{:?}", e)))
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl StoragePort for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A selection the user saved with a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedStatistic {
    pub house_types: Vec<String>,
    pub quarters: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl SavedStatistic {
    pub fn new(selection: &Selection, description: impl Into<String>) -> Self {
        Self {
            house_types: selection.house_types.clone(),
            quarters: selection.quarters.clone(),
            description: description.into(),
        }
    }

    pub fn selection(&self) -> Selection {
        Selection::new(self.house_types.clone(), self.quarters.clone())
    }
}

pub struct SelectionStore<S: StoragePort> {
    storage: S,
}

impl SelectionStore<BrowserStorage> {
    pub fn browser() -> Result<Self, AppError> {
        BrowserStorage::open().map(Self::new)
    }
}

impl<S: StoragePort> SelectionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Last raw values chosen for a form field. Empty when never written.
    pub fn load_choices(&self, field: &str) -> Vec<String> {
        self.load_json(field).unwrap_or_default()
    }

    /// Overwrite the remembered values for a form field.
    pub fn save_choices(&self, field: &str, values: &[String]) -> Result<(), AppError> {
        self.save_json(field, values)
    }

    /// All saved statistics in the order they were saved.
    pub fn load_all(&self) -> Vec<SavedStatistic> {
        self.load_json(SAVED_STATISTICS_KEY).unwrap_or_default()
    }

    /// Append a record and return the full list as written.
    ///
    /// Fails without writing when the existing list cannot be read, so an
    /// unreadable list is never replaced by a shorter one.
    pub fn append(&self, record: SavedStatistic) -> Result<Vec<SavedStatistic>, AppError> {
        let mut saved: Vec<SavedStatistic> =
            self.read_json(SAVED_STATISTICS_KEY)?.unwrap_or_default();
        saved.push(record);
        self.save_json(SAVED_STATISTICS_KEY, &saved)?;
        info!("Saved statistic #{}", saved.len());
        Ok(saved)
    }

    fn load_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        match self.read_json(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unreadable value under '{}': {}", key, e);
                None
            }
        }
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, AppError> {
        let Some(raw) = self.storage.load(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AppError::Storage(format!("Unreadable value under '{}': {}", key, e)))
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value).map_err(|e| AppError::Storage(e.to_string()))?;
        self.storage.save(key, &raw)
    }
}
