//! Typed setting accessor
//!
//! Stateless facade over a backing store and a change bus.
//!
//! # Design
//!
//! `Defaults` holds only a key, a codec and shared handles to the store and
//! bus. It caches nothing: the store owns the data, the bus owns the
//! subscriptions. Multiple instances for the same key are interchangeable,
//! and constructing one never touches storage. Clone is cheap (Arc clones).
//!
//! The slot and topic address is `(C::KIND, key)`, so a primitive and a
//! structured accessor with the same key name never see each other.
//!
//! # Failure policy
//!
//! - Decode failure: logged, reported as absence (`get`, `subscribe`)
//! - Encode failure: logged and returned; storage untouched, nothing published
//! - Store failure: returned; nothing published
//!
//! # Example
//!
//! ```ignore
//! keeper_core::define_keys! {
//!     pub enum AppKey { Theme => "theme" }
//! }
//!
//! let store: Arc<dyn BackingStore> = Arc::new(MemoryStore::new());
//! let bus = ChangeBus::new();
//!
//! let theme = PrimitiveDefaults::<AppKey, String>::new(AppKey::Theme, store, bus);
//! theme.set_value("dark".to_string())?;
//! assert_eq!(theme.get().as_deref(), Some("dark"));
//! ```

use crate::subscription::Subscription;
use keeper_concurrency::ChangeBus;
use keeper_core::{AccessorKind, Codec, Error, RawValue, Result, SettingKey, SlotId};
use keeper_storage::BackingStore;
use std::fmt;
use std::sync::Arc;

/// Typed accessor for one setting
pub struct Defaults<K: SettingKey, C: Codec> {
    key: K,
    codec: Arc<C>,
    store: Arc<dyn BackingStore>,
    bus: ChangeBus,
}

impl<K: SettingKey, C: Codec + Default> Defaults<K, C> {
    /// Create an accessor for `key` using the codec's default configuration
    pub fn new(key: K, store: Arc<dyn BackingStore>, bus: ChangeBus) -> Self {
        Self::with_codec(key, C::default(), store, bus)
    }
}

impl<K: SettingKey, C: Codec> Defaults<K, C> {
    /// Create an accessor with an explicit codec instance
    pub fn with_codec(key: K, codec: C, store: Arc<dyn BackingStore>, bus: ChangeBus) -> Self {
        Self {
            key,
            codec: Arc::new(codec),
            store,
            bus,
        }
    }

    /// Key this accessor reads and writes
    pub fn key(&self) -> K {
        self.key
    }

    /// Storage slot (and change topic) of this accessor
    pub fn slot(&self) -> SlotId {
        SlotId::new(C::KIND, self.key)
    }

    /// Current value, or `None` if absent or unreadable
    pub fn get(&self) -> Option<C::Value> {
        let slot = self.slot();
        decode_or_absent(&*self.codec, &slot, read_or_absent(&*self.store, &slot))
    }

    /// Whether the slot holds anything, readable or not
    ///
    /// `get()` reports absence both for empty slots and for values that no
    /// longer decode; this distinguishes the two.
    pub fn contains(&self) -> bool {
        let slot = self.slot();
        match self.store.contains(&slot) {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!(target: "keeper::defaults", %slot, error = %e, "store read failed");
                false
            }
        }
    }

    /// Store `value`, or remove the setting when `None`
    pub fn set(&self, value: Option<C::Value>) -> Result<()> {
        match value {
            Some(v) => self.set_value(v),
            None => self.remove(),
        }
    }

    /// Encode and store `value`, then notify subscribers
    ///
    /// If encoding or the store write fails, the slot keeps its previous
    /// value and no notification is sent.
    pub fn set_value(&self, value: C::Value) -> Result<()> {
        let slot = self.slot();
        let raw = self.codec.encode(&value).map_err(|e| {
            tracing::warn!(
                target: "keeper::defaults",
                %slot,
                error = %e,
                "encode failed, value not stored"
            );
            Error::from(e)
        })?;

        self.bus.publish_after(&slot, || {
            self.store.write(&slot, raw.clone()).map_err(|e| {
                tracing::warn!(target: "keeper::defaults", %slot, error = %e, "store write failed");
                Error::from(e)
            })?;
            Ok::<_, Error>(Some(raw))
        })?;
        Ok(())
    }

    /// Clear the setting and notify subscribers of absence
    ///
    /// Publishes even when the slot was already empty.
    pub fn remove(&self) -> Result<()> {
        remove_slot(&*self.store, &self.bus, &self.slot())
    }

    /// Stream of this setting's values
    ///
    /// The first item is the value stored right now; every later `set` or
    /// `remove` follows in order.
    pub fn subscribe(&self) -> Subscription<C> {
        let slot = self.slot();
        let raw = self
            .bus
            .subscribe(&slot, || read_or_absent(&*self.store, &slot));
        Subscription::new(raw, Arc::clone(&self.codec))
    }

    /// Remove every key of `K` for this accessor's kind
    ///
    /// See [`remove_all`].
    pub fn remove_all(store: &dyn BackingStore, bus: &ChangeBus) -> RemoveAllReport<K> {
        remove_all::<K>(C::KIND, store, bus)
    }
}

impl<K: SettingKey, C: Codec> Clone for Defaults<K, C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            codec: Arc::clone(&self.codec),
            store: Arc::clone(&self.store),
            bus: self.bus.clone(),
        }
    }
}

impl<K: SettingKey, C: Codec> fmt::Debug for Defaults<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaults")
            .field("key", &self.key)
            .field("kind", &C::KIND)
            .finish()
    }
}

/// Outcome of [`remove_all`]
#[derive(Debug)]
pub struct RemoveAllReport<K> {
    /// Keys cleared and notified
    pub removed: Vec<K>,
    /// Keys whose removal failed, with the error
    pub failed: Vec<(K, Error)>,
}

impl<K> RemoveAllReport<K> {
    /// True when no key failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove every key of `K` under `kind` and publish absence for each
///
/// Best-effort: a failing key is logged and recorded, and the loop moves on
/// to the next one. Typically used to reset all settings on sign-out.
pub fn remove_all<K: SettingKey>(
    kind: AccessorKind,
    store: &dyn BackingStore,
    bus: &ChangeBus,
) -> RemoveAllReport<K> {
    let mut report = RemoveAllReport {
        removed: Vec::with_capacity(K::ALL.len()),
        failed: Vec::new(),
    };

    for key in K::ALL {
        match remove_slot(store, bus, &SlotId::new(kind, *key)) {
            Ok(()) => report.removed.push(*key),
            Err(e) => {
                tracing::warn!(
                    target: "keeper::defaults",
                    key = key.name(),
                    %kind,
                    error = %e,
                    "remove_all: key not removed"
                );
                report.failed.push((*key, e));
            }
        }
    }

    tracing::debug!(
        target: "keeper::defaults",
        %kind,
        removed = report.removed.len(),
        failed = report.failed.len(),
        "remove_all finished"
    );
    report
}

fn remove_slot(store: &dyn BackingStore, bus: &ChangeBus, slot: &SlotId) -> Result<()> {
    bus.publish_after(slot, || {
        store.remove(slot).map_err(|e| {
            tracing::warn!(target: "keeper::defaults", %slot, error = %e, "store remove failed");
            Error::from(e)
        })?;
        Ok::<_, Error>(None)
    })?;
    Ok(())
}

fn read_or_absent(store: &dyn BackingStore, slot: &SlotId) -> Option<RawValue> {
    store.read(slot).unwrap_or_else(|e| {
        tracing::warn!(target: "keeper::defaults", %slot, error = %e, "store read failed");
        None
    })
}

pub(crate) fn decode_or_absent<C: Codec>(
    codec: &C,
    slot: &SlotId,
    raw: Option<RawValue>,
) -> Option<C::Value> {
    match codec.decode(raw?) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                target: "keeper::defaults",
                %slot,
                error = %e,
                "stored value unreadable, treating as absent"
            );
            None
        }
    }
}
