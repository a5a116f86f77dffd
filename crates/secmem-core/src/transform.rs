//! Clear/black transform abstraction.
//!
//! The wrap/unwrap step is an injected capability so a hardware-backed
//! implementation can replace the software one without touching
//! [`crate::KeyStore`]. No identity transform ships here; test doubles live
//! in the harness crate.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::error::TransformError;

/// Directional transform between clear and black key forms.
///
/// # Invariants
///
/// Implementations MUST guarantee:
///
/// - Output length equals input length
/// - The source is never mutated
/// - `to_clear(to_black(x)) == x` for every `x` of the store's capacity
///
/// Output is not required to be stable across calls: a hardware wrap may
/// be randomized, so callers must not cache or compare black values.
pub trait KeyTransform: Send + Sync + 'static {
    /// Wrap a clear key into its black form.
    fn to_black(&self, clear: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError>;

    /// Unwrap a black key into its clear form.
    fn to_clear(&self, black: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError>;
}

impl<T: KeyTransform + ?Sized> KeyTransform for Arc<T> {
    fn to_black(&self, clear: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        (**self).to_black(clear)
    }

    fn to_clear(&self, black: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        (**self).to_clear(black)
    }
}

/// Direction of a transform invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Clear to black (wrap)
    ToBlack,
    /// Black to clear (unwrap)
    ToClear,
}

impl Direction {
    /// Operation name as used in diagnostics.
    pub fn verb(self) -> &'static str {
        match self {
            Self::ToBlack => "encrypt",
            Self::ToClear => "decrypt",
        }
    }
}

/// Dispatches to an injected [`KeyTransform`] and enforces its length
/// contract.
#[derive(Clone)]
pub struct TransformEngine {
    transform: Arc<dyn KeyTransform>,
}

impl TransformEngine {
    /// Wrap a transform implementation.
    pub fn new(transform: impl KeyTransform) -> Self {
        Self { transform: Arc::new(transform) }
    }

    /// Wrap `clear` into black form.
    pub fn to_black(&self, clear: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        self.apply(Direction::ToBlack, clear)
    }

    /// Unwrap `black` into clear form.
    pub fn to_clear(&self, black: &[u8]) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        self.apply(Direction::ToClear, black)
    }

    /// Run the transform in `direction` over a full source buffer.
    ///
    /// # Errors
    ///
    /// Propagates the transform's own error, or
    /// [`TransformError::LengthMismatch`] if it returned the wrong length.
    pub fn apply(
        &self,
        direction: Direction,
        source: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, TransformError> {
        let output = match direction {
            Direction::ToBlack => self.transform.to_black(source)?,
            Direction::ToClear => self.transform.to_clear(source)?,
        };

        if output.len() != source.len() {
            return Err(TransformError::LengthMismatch {
                expected: source.len(),
                actual: output.len(),
            });
        }

        Ok(output)
    }
}

impl std::fmt::Debug for TransformEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformEngine").finish_non_exhaustive()
    }
}
