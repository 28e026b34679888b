//! Backing store interface
//!
//! A backing store is a process-wide `SlotId -> RawValue` map. It knows
//! nothing about codecs or notifications. Implementations must be safe to
//! call from many accessors concurrently and serialize internally.

use keeper_core::{RawValue, SlotId, StoreError};
use std::sync::Arc;

/// Key -> raw value persistence
pub trait BackingStore: Send + Sync {
    /// Read the value stored in `slot`, if any
    fn read(&self, slot: &SlotId) -> Result<Option<RawValue>, StoreError>;

    /// Store `value` in `slot`, replacing any previous value
    ///
    /// On error the slot must be left as it was.
    fn write(&self, slot: &SlotId, value: RawValue) -> Result<(), StoreError>;

    /// Clear `slot`. Removing an empty slot is not an error.
    fn remove(&self, slot: &SlotId) -> Result<(), StoreError>;

    /// Check whether `slot` holds a value
    fn contains(&self, slot: &SlotId) -> Result<bool, StoreError> {
        Ok(self.read(slot)?.is_some())
    }
}

impl<S: BackingStore + ?Sized> BackingStore for Arc<S> {
    fn read(&self, slot: &SlotId) -> Result<Option<RawValue>, StoreError> {
        (**self).read(slot)
    }

    fn write(&self, slot: &SlotId, value: RawValue) -> Result<(), StoreError> {
        (**self).write(slot, value)
    }

    fn remove(&self, slot: &SlotId) -> Result<(), StoreError> {
        (**self).remove(slot)
    }

    fn contains(&self, slot: &SlotId) -> Result<bool, StoreError> {
        (**self).contains(slot)
    }
}
