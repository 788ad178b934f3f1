//! Error handling for store operations

use crate::info::InfoType;
use std::collections::TryReserveError;
use thiserror::Error;

/// Store-specific errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No loader is registered for the URI scheme
    #[error("Unsupported URI scheme: {scheme}")]
    UnsupportedScheme {
        /// Scheme token extracted from the URI
        scheme: String,
    },

    /// Scheme token exceeds the configured maximum length
    #[error("URI scheme too long: {len} bytes, maximum is {max}")]
    SchemeTooLong {
        /// Length of the scheme token in bytes
        len: usize,
        /// Configured maximum length
        max: usize,
    },

    /// Scheme token is not a valid scheme name
    #[error("Invalid URI scheme: {0:?}")]
    InvalidScheme(String),

    /// A loader is already registered for this scheme
    #[error("A loader is already registered for scheme {0:?}")]
    DuplicateScheme(String),

    /// The resolved loader could not open the resource
    #[error("Loader for scheme {scheme:?} could not open resource: {source}")]
    LoaderOpen {
        /// Scheme of the loader that failed
        scheme: String,
        /// Underlying loader failure
        #[source]
        source: Box<StoreError>,
    },

    /// Memory allocation failed
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),

    /// A take accessor was used on a result object of another kind
    #[error("Wrong kind of store info: expected {expected}, found {actual}")]
    KindMismatch {
        /// Kind the caller asked for
        expected: InfoType,
        /// Kind the object actually holds
        actual: InfoType,
    },

    /// Invalid argument passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation is not supported by the loader
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// Input could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic loader failure
    #[error("Loader error: {0}")]
    Loader(String),

    /// Internal error occurred
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create an `invalid_argument` error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an `unsupported` error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a loader error
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::Loader(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for the kind-mismatch error raised by take accessors
    #[must_use]
    pub fn is_kind_mismatch(&self) -> bool {
        matches!(self, Self::KindMismatch { .. })
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
