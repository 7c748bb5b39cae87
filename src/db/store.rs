// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value store backends.
//!
//! - `FileStore`: one file per key in a data directory (production)
//! - `MemoryStore`: in-process map with a write counter (tests)

use crate::db::{KeyValueStore, StoreError};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// File-backed store. Each key lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            key: dir.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(StoreError::Decode {
                key: key.to_string(),
                message: e.to_string(),
            }),
            Err(e) => Err(StoreError::Io {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let io_err = |e: std::io::Error| StoreError::Io {
            key: key.to_string(),
            message: e.to_string(),
        };

        // Write-then-rename so readers never observe a partial value.
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, self.path_for(key)).map_err(io_err)?;
        Ok(())
    }
}

/// In-memory store for tests and offline use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a value without counting it as a write.
    pub fn with_value(self, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Number of `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw stored value, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|e| StoreError::Io {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|e| StoreError::Io {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.load("zenstep_theme").unwrap(), None);
        store.save("zenstep_theme", "dark").unwrap();
        store.save("zenstep_theme", "light").unwrap();
        assert_eq!(store.load("zenstep_theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_file_store_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.save("zenstep_data", "[]").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["zenstep_data.json"]);
    }

    #[test]
    fn test_file_store_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.save("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::new().with_value("k", "seed");
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.load("k").unwrap().as_deref(), Some("seed"));

        store.save("k", "v").unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.raw("k").as_deref(), Some("v"));
    }
}
