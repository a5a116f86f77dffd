//! Clear/black key store with on-demand transforms on read.

#![allow(clippy::disallowed_types, reason = "Synchronous in-memory operations only")]

use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;
use zeroize::Zeroizing;

use crate::{
    KEY_CAPACITY,
    buffer::{KeyBuffer, read_clamped},
    error::KeyStoreError,
    transform::{Direction, KeyTransform, TransformEngine},
};

/// One of the two named buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Plaintext key
    Clear,
    /// Wrapped key
    Black,
}

impl Resource {
    /// Both resources, clear first.
    pub const ALL: [Self; 2] = [Self::Clear, Self::Black];

    /// Resource name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Black => "black",
        }
    }

    /// The resource whose stored bytes a read of `self` is derived from.
    pub fn source(self) -> Self {
        match self {
            Self::Clear => Self::Black,
            Self::Black => Self::Clear,
        }
    }

    /// Transform applied to the source buffer when reading `self`.
    pub fn read_direction(self) -> Direction {
        match self {
            Self::Clear => Direction::ToClear,
            Self::Black => Direction::ToBlack,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clear" => Ok(Self::Clear),
            "black" => Ok(Self::Black),
            other => Err(UnknownResource(other.to_string())),
        }
    }
}

/// Name that is neither `clear` nor `black`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource: {0}")]
pub struct UnknownResource(pub String);

/// Owns the clear and black buffers and the transform used to serve reads.
///
/// Writes store raw bytes in the named buffer. Reads derive the requested
/// resource from the *other* buffer, freshly, on every call:
///
/// - `read(Clear)` is `to_clear(black.bytes)`
/// - `read(Black)` is `to_black(clear.bytes)`
///
/// There is no cached or dirty state. A direct write to one resource is
/// never visible through a read of that same resource.
///
/// # Concurrency
///
/// Each buffer has its own mutex. Writes are atomic with respect to other
/// operations on the same buffer, and reads transform a snapshot taken under
/// the source buffer's lock. No ordering holds across the two buffers.
pub struct KeyStore {
    clear: Mutex<KeyBuffer>,
    black: Mutex<KeyBuffer>,
    engine: TransformEngine,
    capacity: usize,
}

impl KeyStore {
    /// Create a store of [`KEY_CAPACITY`] bytes per buffer.
    pub fn new(transform: impl KeyTransform) -> Self {
        Self::with_engine(KEY_CAPACITY, TransformEngine::new(transform))
    }

    /// Create a store with a custom buffer capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize, transform: impl KeyTransform) -> Self {
        Self::with_engine(capacity, TransformEngine::new(transform))
    }

    fn with_engine(capacity: usize, engine: TransformEngine) -> Self {
        Self {
            clear: Mutex::new(KeyBuffer::new(Resource::Clear.name(), capacity)),
            black: Mutex::new(KeyBuffer::new(Resource::Black.name(), capacity)),
            engine,
            capacity,
        }
    }

    /// Capacity of each buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Write raw bytes into `resource` at `offset`.
    ///
    /// No transform is applied; the bytes are stored verbatim.
    ///
    /// # Errors
    ///
    /// [`KeyStoreError::Buffer`] if the write falls outside the buffer. The
    /// buffer is unchanged on error.
    pub fn write(
        &self,
        resource: Resource,
        offset: usize,
        data: &[u8],
    ) -> Result<usize, KeyStoreError> {
        let mut buffer = self.lock(resource);

        match buffer.write(offset, data) {
            Ok(written) => {
                tracing::debug!(%resource, offset, len = written, "key buffer written");
                Ok(written)
            },
            Err(e) => {
                tracing::warn!(%resource, offset, len = data.len(), "rejected write: {e}");
                Err(e.into())
            },
        }
    }

    /// Read up to `max_len` bytes of `resource` starting at `offset`.
    ///
    /// The full value is derived from the other buffer through the transform,
    /// then clamped: `offset >= capacity` yields an empty result, otherwise
    /// `min(max_len, capacity - offset)` bytes are returned.
    ///
    /// # Errors
    ///
    /// [`KeyStoreError::Transform`] if the transform fails. No bytes are
    /// returned in that case.
    pub fn read(
        &self,
        resource: Resource,
        offset: usize,
        max_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>, KeyStoreError> {
        let source = self.snapshot(resource.source());
        let direction = resource.read_direction();

        let derived = match self.engine.apply(direction, &source) {
            Ok(derived) => derived,
            Err(e) => {
                tracing::warn!(%resource, ?direction, "transform failed: {e}");
                return Err(e.into());
            },
        };

        let served = Zeroizing::new(read_clamped(&derived, offset, max_len).to_vec());
        tracing::debug!(%resource, offset, len = served.len(), "key buffer read");

        Ok(served)
    }

    /// Copy of the raw bytes stored under `resource`, without any transform.
    ///
    /// This is what was last written, not what [`read`](Self::read) serves.
    pub fn stored(&self, resource: Resource) -> Zeroizing<Vec<u8>> {
        self.snapshot(resource)
    }

    /// Zero both buffers.
    pub fn wipe(&self) {
        for resource in Resource::ALL {
            self.lock(resource).wipe();
        }
        tracing::debug!("key buffers wiped");
    }

    fn snapshot(&self, resource: Resource) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.lock(resource).as_bytes().to_vec())
    }

    // A panic while holding the lock cannot leave a partial write behind:
    // buffers only change through a single bounds-checked copy.
    fn lock(&self, resource: Resource) -> MutexGuard<'_, KeyBuffer> {
        let mutex = match resource {
            Resource::Clear => &self.clear,
            Resource::Black => &self.black,
        };
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore").field("capacity", &self.capacity).finish_non_exhaustive()
    }
}
