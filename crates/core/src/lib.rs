//! Core types for keeper
//!
//! This crate defines the vocabulary shared by every other keeper crate:
//! - RawValue: what a backing store slot physically holds
//! - SettingKey / define_keys!: the closed, compile-time key set
//! - AccessorKind / SlotId: slot and topic addressing
//! - Codec: typed value <-> RawValue translation
//! - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod key;
pub mod value;

pub use codec::{Codec, Format, IdentityCodec, Json, MessagePack, Primitive, StructuredCodec};
pub use error::{DecodeError, EncodeError, Error, Result, StoreError};
pub use key::{AccessorKind, SettingKey, SlotId, Topic, SLOT_SEP};
pub use value::RawValue;
