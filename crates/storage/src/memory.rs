//! In-memory backing store
//!
//! DashMap keyed by `SlotId` with FxHash. Lock-free reads, sharded writes.
//! Used in tests and for ephemeral settings that do not need to survive the
//! process.

use crate::backing::BackingStore;
use dashmap::DashMap;
use keeper_core::{RawValue, SlotId, StoreError};
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

type FxBuild = BuildHasherDefault<FxHasher>;

/// Sharded in-memory slot map
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - read(): lock-free via DashMap read guard
/// - write()/remove(): only lock the slot's shard
pub struct MemoryStore {
    slots: DashMap<SlotId, RawValue, FxBuild>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: DashMap::with_hasher(FxBuild::default()),
        }
    }

    /// Create with room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: DashMap::with_capacity_and_hasher(capacity, FxBuild::default()),
        }
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every slot
    ///
    /// Bypasses the change bus; prefer `Defaults::remove_all` when
    /// subscribers must be told.
    pub fn clear(&self) {
        self.slots.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BackingStore for MemoryStore {
    #[inline]
    fn read(&self, slot: &SlotId) -> Result<Option<RawValue>, StoreError> {
        Ok(self.slots.get(slot).map(|v| v.value().clone()))
    }

    #[inline]
    fn write(&self, slot: &SlotId, value: RawValue) -> Result<(), StoreError> {
        self.slots.insert(*slot, value);
        Ok(())
    }

    #[inline]
    fn remove(&self, slot: &SlotId) -> Result<(), StoreError> {
        self.slots.remove(slot);
        Ok(())
    }

    #[inline]
    fn contains(&self, slot: &SlotId) -> Result<bool, StoreError> {
        Ok(self.slots.contains_key(slot))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("len", &self.len())
            .finish()
    }
}
