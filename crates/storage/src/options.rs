//! Configuration for opening a [`FileStore`](crate::FileStore).
//!
//! Use the builder pattern:
//!
//! ```ignore
//! use keeper_storage::{FileStore, OpenOptions};
//!
//! let opts = OpenOptions::new().create_dirs(true).sync_on_write(false);
//! let store = FileStore::open_with("settings/app.json", opts)?;
//! ```

/// Options for opening a file-backed store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// Start empty when the file does not exist (default `true`).
    pub create: bool,
    /// Create missing parent directories (default `false`).
    pub create_dirs: bool,
    /// fsync the file before every rename (default `true`).
    pub sync_on_write: bool,
}

impl OpenOptions {
    /// Create a new `OpenOptions` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow opening a path that does not exist yet.
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Create missing parent directories on open.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    /// Flush file contents to disk on every write.
    pub fn sync_on_write(mut self, sync: bool) -> Self {
        self.sync_on_write = sync;
        self
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            create: true,
            create_dirs: false,
            sync_on_write: true,
        }
    }
}
