//! File-backed store
//!
//! The whole store is one JSON object mapping rendered slot ids
//! (`"primitive/theme"`) to raw values. It is loaded once at open and kept in
//! memory; every write or remove rewrites the file atomically (temp file in
//! the same directory, then rename).
//!
//! If persisting fails the in-memory entry is rolled back and the error is
//! returned, so the slot always matches what is on disk.

use crate::backing::BackingStore;
use crate::options::OpenOptions;
use keeper_core::{AccessorKind, RawValue, SlotId, StoreError, SLOT_SEP};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Persistent slot map backed by a single JSON file
pub struct FileStore {
    path: PathBuf,
    options: OpenOptions,
    /// Rendered slot id -> value. Writers hold the lock across persist.
    entries: Mutex<FxHashMap<String, RawValue>>,
}

impl FileStore {
    /// Open `path` with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with(path, OpenOptions::default())
    }

    /// Open `path` with explicit options
    pub fn open_with(path: impl AsRef<Path>, options: OpenOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if options.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let entries = match fs::read(&path) {
            Ok(bytes) => load_entries(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound && options.create => FxHashMap::default(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        tracing::debug!(
            target: "keeper::storage",
            path = %path.display(),
            entries = entries.len(),
            "opened file store"
        );

        Ok(Self {
            path,
            options,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored entries, including ones no current key addresses
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn persist(&self, entries: &FxHashMap<String, RawValue>) -> Result<(), StoreError> {
        let ordered: BTreeMap<&String, &RawValue> = entries.iter().collect();
        let bytes = serde_json::to_vec_pretty(&ordered).map_err(|e| StoreError::Format {
            reason: e.to_string(),
        })?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        if self.options.sync_on_write {
            tmp.as_file()
                .sync_all()
                .map_err(|e| StoreError::io(tmp.path(), e))?;
        }
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        Ok(())
    }

    // Set or clear the entry for `slot`, persist, and roll back on failure.
    fn mutate(&self, slot: &SlotId, value: Option<RawValue>) -> Result<(), StoreError> {
        let id = slot.to_string();
        let mut entries = self.entries.lock();

        let previous = match value {
            Some(v) => entries.insert(id.clone(), v),
            None => entries.remove(&id),
        };

        if let Err(e) = self.persist(&entries) {
            match previous {
                Some(old) => entries.insert(id, old),
                None => entries.remove(&id),
            };
            tracing::error!(
                target: "keeper::storage",
                slot = %slot,
                error = %e,
                "failed to persist store, change rolled back"
            );
            return Err(e);
        }
        Ok(())
    }
}

fn load_entries(bytes: &[u8]) -> Result<FxHashMap<String, RawValue>, StoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(FxHashMap::default());
    }

    let raw: BTreeMap<String, RawValue> =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Format {
            reason: e.to_string(),
        })?;

    Ok(raw
        .into_iter()
        .filter(|(id, _)| {
            let valid = is_slot_id(id);
            if !valid {
                tracing::warn!(
                    target: "keeper::storage",
                    entry = %id,
                    "skipping malformed slot id"
                );
            }
            valid
        })
        .collect())
}

fn is_slot_id(id: &str) -> bool {
    match id.split_once(SLOT_SEP) {
        Some((kind, name)) => AccessorKind::from_prefix(kind).is_some() && !name.is_empty(),
        None => false,
    }
}

impl BackingStore for FileStore {
    fn read(&self, slot: &SlotId) -> Result<Option<RawValue>, StoreError> {
        Ok(self.entries.lock().get(&slot.to_string()).cloned())
    }

    fn write(&self, slot: &SlotId, value: RawValue) -> Result<(), StoreError> {
        // serde_json writes NaN and infinities as null, which would not load back.
        if let RawValue::F64(v) = value {
            if !v.is_finite() {
                return Err(StoreError::Format {
                    reason: format!("{} cannot be persisted", v),
                });
            }
        }
        self.mutate(slot, Some(value))
    }

    fn remove(&self, slot: &SlotId) -> Result<(), StoreError> {
        if !self.entries.lock().contains_key(&slot.to_string()) {
            return Ok(());
        }
        self.mutate(slot, None)
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("entries", &self.len())
            .finish()
    }
}
