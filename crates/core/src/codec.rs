//! Codecs translating typed values to and from `RawValue`
//!
//! Two codecs ship with keeper:
//!
//! - [`IdentityCodec`]: pass-through for types a backing store holds natively.
//!   Encoding never fails.
//! - [`StructuredCodec`]: any serde type, serialized to bytes through a
//!   [`Format`] (JSON by default, MessagePack available).
//!
//! For every value a codec accepts, `decode(encode(v)) == v`.
//!
//! Each codec also names the [`AccessorKind`] it belongs to. That kind scopes
//! the storage slot, so the two codecs never read each other's data.

use crate::error::{DecodeError, EncodeError};
use crate::key::AccessorKind;
use crate::value::RawValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Encode/decode pair for one value type
pub trait Codec: Send + Sync + 'static {
    /// Logical value type
    type Value: Send + 'static;

    /// Accessor family this codec stores under
    const KIND: AccessorKind;

    /// Turn a value into its stored form
    fn encode(&self, value: &Self::Value) -> Result<RawValue, EncodeError>;

    /// Parse a stored form back into a value
    fn decode(&self, raw: RawValue) -> Result<Self::Value, DecodeError>;
}

// ============================================================================
// Identity codec
// ============================================================================

/// Types a backing store can hold without serialization
pub trait Primitive: Sized + Send + Sync + 'static {
    /// Stored form of this value
    fn to_raw(&self) -> RawValue;

    /// Extract a value of this type, rejecting other variants
    fn from_raw(raw: RawValue) -> Result<Self, DecodeError>;
}

macro_rules! impl_primitive {
    ($ty:ty, $variant:ident) => {
        impl Primitive for $ty {
            fn to_raw(&self) -> RawValue {
                RawValue::$variant(Clone::clone(self))
            }

            fn from_raw(raw: RawValue) -> Result<Self, DecodeError> {
                match raw {
                    RawValue::$variant(v) => Ok(v),
                    other => Err(DecodeError::new::<$ty>(format!(
                        "stored value is {}",
                        other.type_name()
                    ))),
                }
            }
        }
    };
}

impl_primitive!(bool, Bool);
impl_primitive!(i64, I64);
impl_primitive!(f64, F64);
impl_primitive!(String, String);
impl_primitive!(Vec<u8>, Bytes);

macro_rules! impl_narrow_int {
    ($ty:ty) => {
        impl Primitive for $ty {
            fn to_raw(&self) -> RawValue {
                RawValue::I64(i64::from(*self))
            }

            fn from_raw(raw: RawValue) -> Result<Self, DecodeError> {
                match raw {
                    RawValue::I64(v) => <$ty>::try_from(v).map_err(|_| {
                        DecodeError::new::<$ty>(format!("{} is out of range", v))
                    }),
                    other => Err(DecodeError::new::<$ty>(format!(
                        "stored value is {}",
                        other.type_name()
                    ))),
                }
            }
        }
    };
}

impl_narrow_int!(i32);
impl_narrow_int!(u32);

/// Pass-through codec for [`Primitive`] values
pub struct IdentityCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> IdentityCodec<T> {
    /// Create the codec
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for IdentityCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for IdentityCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityCodec<{}>", std::any::type_name::<T>())
    }
}

impl<T: Primitive> Codec for IdentityCodec<T> {
    type Value = T;
    const KIND: AccessorKind = AccessorKind::Primitive;

    fn encode(&self, value: &T) -> Result<RawValue, EncodeError> {
        Ok(value.to_raw())
    }

    fn decode(&self, raw: RawValue) -> Result<T, DecodeError> {
        T::from_raw(raw)
    }
}

// ============================================================================
// Structured codec
// ============================================================================

/// Byte format used by [`StructuredCodec`]
pub trait Format: Send + Sync + 'static {
    /// Human readable format name
    const NAME: &'static str;

    /// Serialize `value` to bytes
    fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, String>;

    /// Deserialize bytes into `T`
    fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String>;
}

/// JSON via serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Format for Json {
    const NAME: &'static str = "json";

    fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, String> {
        serde_json::to_vec(value).map_err(|e| e.to_string())
    }

    fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}

/// MessagePack via rmp-serde
///
/// Structs are written as maps so added or reordered fields survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePack;

impl Format for MessagePack {
    const NAME: &'static str = "msgpack";

    fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, String> {
        rmp_serde::to_vec_named(value).map_err(|e| e.to_string())
    }

    fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
        rmp_serde::from_slice(bytes).map_err(|e| e.to_string())
    }
}

/// Serde codec storing values as `RawValue::Bytes`
///
/// Decoding fails when the stored bytes no longer match `T`'s schema, e.g.
/// after a field was renamed. Accessors treat that as absence.
pub struct StructuredCodec<T, F = Json> {
    _marker: PhantomData<fn() -> (T, F)>,
}

impl<T, F> StructuredCodec<T, F> {
    /// Create the codec
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T, F> Default for StructuredCodec<T, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F: Format> fmt::Debug for StructuredCodec<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StructuredCodec<{}, {}>",
            std::any::type_name::<T>(),
            F::NAME
        )
    }
}

impl<T, F> Codec for StructuredCodec<T, F>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: Format,
{
    type Value = T;
    const KIND: AccessorKind = AccessorKind::Structured;

    fn encode(&self, value: &T) -> Result<RawValue, EncodeError> {
        F::to_bytes(value)
            .map(RawValue::Bytes)
            .map_err(|e| EncodeError::new::<T>(e))
    }

    fn decode(&self, raw: RawValue) -> Result<T, DecodeError> {
        match raw {
            RawValue::Bytes(bytes) => {
                F::from_bytes(&bytes).map_err(|e| DecodeError::new::<T>(e))
            }
            other => Err(DecodeError::new::<T>(format!(
                "expected {} bytes, stored value is {}",
                F::NAME,
                other.type_name()
            ))),
        }
    }
}
