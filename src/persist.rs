//! Persistence: abstract key-value store and the JSON-file implementation.
//!
//! The engine writes its four owned collections as independent named entries
//! after each committed mutation, and reads them back at startup. Persistence
//! is best-effort: a failed write is logged and the in-memory commit stands.
//!
//! # Design
//!
//! - **Abstract boundary**: the engine only sees the `StateStore` trait
//! - **Self-healing reads**: absent or malformed entries default to empty
//! - **No partial schemas**: each entry is one whole collection, pretty JSON

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

/// Entry name for the container store.
pub const KEY_CONTAINERS: &str = "containers";
/// Entry name for the inbound queue.
pub const KEY_INBOUND: &str = "inbound";
/// Entry name for the slot layout.
pub const KEY_LAYOUT: &str = "layout";
/// Entry name for the acknowledged baseline.
pub const KEY_BASELINE: &str = "baseline";

/// Abstract key-value store the engine persists into.
pub trait StateStore {
    /// Write one named entry, replacing any previous value.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Read one named entry. `Ok(None)` when the entry does not exist.
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Directory-backed store: each entry is a `<key>.json` file.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if necessary) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        fs::write(self.entry_path(key), value)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }
}

/// Decode one persisted entry, falling back to the default on absence or
/// malformed content. Deserialization problems are logged, never fatal:
/// startup must always succeed with a usable (possibly empty) state.
pub fn load_entry<T>(store: &dyn StateStore, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "malformed persisted entry, starting empty");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(err) => {
            warn!(key, %err, "failed to read persisted entry, starting empty");
            T::default()
        }
    }
}
