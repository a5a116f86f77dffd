//! KEK construction errors.

use thiserror::Error;

/// Errors constructing a [`crate::KekTransform`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KekError {
    /// KEK material has the wrong length.
    #[error("key-encryption key must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// OS random number generator failed.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}
