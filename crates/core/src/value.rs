//! Raw values held by a backing store
//!
//! A `RawValue` is what a slot physically contains: one of a small closed set
//! of primitives, or opaque bytes produced by a structured codec.
//!
//! # Serialized form
//!
//! Scalars serialize as their natural JSON counterpart. Bytes are wrapped as
//! `{"$bytes": "<base64>"}` so a persisted store file stays readable JSON.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value as stored in a backing store slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Repr", try_from = "Repr")]
pub enum RawValue {
    /// Boolean flag
    Bool(bool),
    /// Signed 64-bit integer
    I64(i64),
    /// 64-bit float
    F64(f64),
    /// UTF-8 string
    String(String),
    /// Opaque bytes (structured codec output)
    Bytes(Vec<u8>),
}

impl RawValue {
    /// Name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::I64(_) => "i64",
            RawValue::F64(_) => "f64",
            RawValue::String(_) => "string",
            RawValue::Bytes(_) => "bytes",
        }
    }

    /// Borrow the payload if this is a `Bytes` value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(v) => write!(f, "{}", v),
            RawValue::I64(v) => write!(f, "{}", v),
            RawValue::F64(v) => write!(f, "{}", v),
            RawValue::String(v) => write!(f, "{:?}", v),
            RawValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::I64(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::F64(v)
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::String(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::String(v.to_string())
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(v: Vec<u8>) -> Self {
        RawValue::Bytes(v)
    }
}

// ============================================================================
// Serde representation
// ============================================================================

#[derive(Serialize, Deserialize)]
struct BytesWrapper {
    #[serde(rename = "$bytes")]
    b64: String,
}

// Order matters for untagged deserialization: integers before floats.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Bytes(BytesWrapper),
}

impl From<RawValue> for Repr {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Bool(v) => Repr::Bool(v),
            RawValue::I64(v) => Repr::I64(v),
            RawValue::F64(v) => Repr::F64(v),
            RawValue::String(v) => Repr::String(v),
            RawValue::Bytes(v) => Repr::Bytes(BytesWrapper {
                b64: STANDARD.encode(v),
            }),
        }
    }
}

impl TryFrom<Repr> for RawValue {
    type Error = String;

    fn try_from(repr: Repr) -> Result<Self, Self::Error> {
        Ok(match repr {
            Repr::Bool(v) => RawValue::Bool(v),
            Repr::I64(v) => RawValue::I64(v),
            Repr::F64(v) => RawValue::F64(v),
            Repr::String(v) => RawValue::String(v),
            Repr::Bytes(w) => RawValue::Bytes(
                STANDARD
                    .decode(w.b64)
                    .map_err(|e| format!("invalid $bytes payload: {}", e))?,
            ),
        })
    }
}
