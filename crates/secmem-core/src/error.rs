//! Error types for key staging.
//!
//! Write-path bounds errors and transform errors are kept in separate enums
//! so each layer only returns what it can actually produce. [`KeyStoreError`]
//! joins them at the store boundary.

use thiserror::Error;

/// Bounds violations on the write path.
///
/// Both variants are caller errors and never retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Write would begin past the end of the buffer.
    #[error("offset {offset} is beyond buffer capacity {capacity}")]
    OffsetOutOfRange {
        /// Requested start offset
        offset: usize,
        /// Buffer capacity
        capacity: usize,
    },

    /// Write would spill past the end of the buffer.
    #[error("write of {len} bytes at offset {offset} overflows buffer capacity {capacity}")]
    BufferOverflow {
        /// Requested start offset
        offset: usize,
        /// Length of the rejected data
        len: usize,
        /// Buffer capacity
        capacity: usize,
    },
}

/// Failure of a clear/black transform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Backing key store or device is unavailable. May succeed on retry.
    #[error("transform backend unavailable: {0}")]
    Unavailable(String),

    /// The operation ran and failed.
    #[error("transform failed: {0}")]
    Failed(String),

    /// Transform produced output of the wrong length.
    #[error("transform output length {actual} does not match input length {expected}")]
    LengthMismatch {
        /// Length of the source buffer
        expected: usize,
        /// Length the transform returned
        actual: usize,
    },
}

impl TransformError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Caller-visible failure kind.
///
/// The portable contract only distinguishes these three kinds; exact error
/// codes belong to the exposing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Write offset begins beyond capacity
    OffsetOutOfRange,
    /// Write extends beyond capacity
    BufferOverflow,
    /// Transform could not produce a result
    Transform,
}

/// Errors returned by [`crate::KeyStore`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyStoreError {
    /// Write rejected by bounds checks
    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// Read failed while transforming the source buffer
    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl KeyStoreError {
    /// Failure kind for mapping onto caller error codes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Buffer(BufferError::OffsetOutOfRange { .. }) => ErrorKind::OffsetOutOfRange,
            Self::Buffer(BufferError::BufferOverflow { .. }) => ErrorKind::BufferOverflow,
            Self::Transform(_) => ErrorKind::Transform,
        }
    }

    /// Whether retrying the same operation may succeed.
    ///
    /// Bounds errors never succeed on retry. The store itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Buffer(_) => false,
            Self::Transform(e) => e.is_retryable(),
        }
    }
}
