//! Error types for keeper
//!
//! - `EncodeError`: a value could not be turned into a `RawValue`
//! - `DecodeError`: a stored `RawValue` does not parse as the expected type
//! - `StoreError`: the backing store failed to read or persist
//!
//! Decode failures are never returned from reads; accessors log them and
//! report absence. They are public so codecs and tests can inspect them.

use std::path::PathBuf;
use thiserror::Error;

/// Value could not be encoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot encode {type_name}: {reason}")]
pub struct EncodeError {
    /// Rust type that was being encoded
    pub type_name: &'static str,
    /// Underlying serializer message
    pub reason: String,
}

impl EncodeError {
    /// Build an error for type `T`
    pub fn new<T: ?Sized>(reason: impl Into<String>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }
}

/// Stored value could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {type_name}: {reason}")]
pub struct DecodeError {
    /// Rust type that was expected
    pub type_name: &'static str,
    /// Why the raw value was rejected
    pub reason: String,
}

impl DecodeError {
    /// Build an error for type `T`
    pub fn new<T: ?Sized>(reason: impl Into<String>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }
}

/// Backing store failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error while loading or persisting
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Persisted data is not in the expected shape
    #[error("malformed store data: {reason}")]
    Format {
        /// Description of the problem
        reason: String,
    },
}

impl StoreError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any failure surfaced by a keeper operation
#[derive(Debug, Error)]
pub enum Error {
    /// Encoding failed; nothing was written
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Decoding failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The backing store failed; nothing was published
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for keeper operations
pub type Result<T> = std::result::Result<T, Error>;
