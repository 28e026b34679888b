//! Backing stores for keeper
//!
//! - [`BackingStore`]: the narrow read/write/remove interface accessors use
//! - [`MemoryStore`]: sharded in-memory map
//! - [`FileStore`]: single JSON file, atomically rewritten on change

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backing;
pub mod file;
pub mod memory;
pub mod options;

pub use backing::BackingStore;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use options::OpenOptions;
