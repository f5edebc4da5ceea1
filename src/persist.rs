//! Persisted view state: mode, selected tags, onboarding flag.
//!
//! Storage is a flat string key-value store behind the [`ViewStore`] trait.
//! Key names come from `[storage]` in the config. Values use the same shapes
//! a browser's local storage would hold:
//!
//! | Key | Value |
//! |---|---|
//! | mode | `all` or `personalized` |
//! | onboarded | `true` once the intro was shown |
//! | selected tags | JSON array of strings |
//!
//! A corrupt selected-tags value is not an error for the viewer:
//! [`restore_state`] logs a warning, starts with no tags, and continues.

use crate::config::StorageKeys;
use crate::filter::ViewMode;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt stored value: {0}")]
    Corrupt(String),
}

pub trait ViewStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store. Starts empty unless seeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl ViewStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let values = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Empty store that writes to `path` on the first `set`.
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            values: BTreeMap::new(),
        }
    }

    /// Open `path`, starting over with an empty store when the file is not
    /// a JSON object of strings. I/O errors still propagate.
    pub fn open_or_reset(path: &Path) -> Result<Self, StoreError> {
        match Self::open(path) {
            Err(StoreError::Json(err)) => {
                tracing::warn!(path = %path.display(), %err, "corrupt view state file, starting fresh");
                Ok(Self::empty(path))
            }
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ViewStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// View state restored at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Lowercase.
    pub selected_tags: BTreeSet<String>,
    pub onboarded: bool,
}

pub fn restore_state(store: &dyn ViewStore, keys: &StorageKeys) -> Result<ViewState, StoreError> {
    let mode = match store.get(&keys.mode)? {
        Some(saved) => saved.parse().unwrap_or_else(|_| {
            tracing::debug!(%saved, "ignoring unknown stored view mode");
            ViewMode::default()
        }),
        None => ViewMode::default(),
    };

    let selected_tags = match read_selected_tags(store, &keys.selected_tags) {
        Ok(tags) => tags,
        Err(StoreError::Corrupt(reason)) => {
            tracing::warn!(%reason, "failed to restore selected tags, starting with none");
            BTreeSet::new()
        }
        Err(e) => return Err(e),
    };

    let onboarded = store.get(&keys.onboarded)?.is_some();

    Ok(ViewState {
        mode,
        selected_tags,
        onboarded,
    })
}

fn read_selected_tags(store: &dyn ViewStore, key: &str) -> Result<BTreeSet<String>, StoreError> {
    let Some(saved) = store.get(key)? else {
        return Ok(BTreeSet::new());
    };
    let tags: Vec<String> =
        serde_json::from_str(&saved).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(tags.iter().map(|t| t.to_lowercase()).collect())
}

pub fn save_mode(store: &mut dyn ViewStore, keys: &StorageKeys, mode: ViewMode) -> Result<(), StoreError> {
    store.set(&keys.mode, mode.as_str())
}

pub fn save_selected_tags(
    store: &mut dyn ViewStore,
    keys: &StorageKeys,
    tags: &BTreeSet<String>,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(tags)?;
    store.set(&keys.selected_tags, &json)
}

pub fn mark_onboarded(store: &mut dyn ViewStore, keys: &StorageKeys) -> Result<(), StoreError> {
    store.set(&keys.onboarded, "true")
}
