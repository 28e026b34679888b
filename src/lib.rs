//! keeper: a typed, observable key-value settings store
//!
//! Declare a closed key set, wire a backing store and change bus, and read,
//! write and observe settings through typed accessors:
//!
//! ```
//! use keeper::{define_keys, ChangeBus, MemoryStore, PrimitiveDefaults, BackingStore};
//! use std::sync::Arc;
//!
//! define_keys! {
//!     pub enum AppKey {
//!         Theme => "theme",
//!     }
//! }
//!
//! let store: Arc<dyn BackingStore> = Arc::new(MemoryStore::new());
//! let bus = ChangeBus::new();
//!
//! let theme = PrimitiveDefaults::<AppKey, String>::new(AppKey::Theme, store, bus);
//! let mut changes = theme.subscribe();
//!
//! theme.set_value("dark".to_string()).unwrap();
//!
//! assert_eq!(theme.get().as_deref(), Some("dark"));
//! assert_eq!(changes.drain(), vec![None, Some("dark".to_string())]);
//! ```

#![warn(missing_docs)]

pub mod types;

pub use keeper_core::define_keys;
pub use types::*;
