//! Reference model for model-based testing.
//!
//! [`ModelStore`] is the obvious, lock-free rendition of the key store: two
//! plain vectors and the bounds arithmetic written out longhand. Operations
//! are generated by proptest or a fuzzer, applied to both the model and a
//! real [`KeyStore`], and the [`OperationResult`]s compared.

use arbitrary::Arbitrary;
use secmem_core::{ErrorKind, KeyStore, KeyTransform, Resource};

/// Resource selector that can be generated by `arbitrary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Target {
    /// The clear buffer
    Clear,
    /// The black buffer
    Black,
}

impl From<Target> for Resource {
    fn from(target: Target) -> Self {
        match target {
            Target::Clear => Resource::Clear,
            Target::Black => Resource::Black,
        }
    }
}

/// Operation applied to both the model and the real store.
///
/// Offsets and lengths are `u8` so generated values land on both sides of a
/// 32-byte capacity often.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Raw write into a buffer.
    Write {
        /// Buffer written
        target: Target,
        /// Start offset
        offset: u8,
        /// Bytes to store
        data: Vec<u8>,
    },

    /// Transformed read of a buffer.
    Read {
        /// Buffer read
        target: Target,
        /// Start offset
        offset: u8,
        /// Maximum bytes to return
        max_len: u8,
    },
}

/// Observable outcome of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Write accepted, with the byte count
    Written(usize),
    /// Read served these bytes
    Read(Vec<u8>),
    /// Operation failed with this kind
    Failed(ErrorKind),
}

impl Operation {
    /// Apply to a real store.
    pub fn apply_to(&self, store: &KeyStore) -> OperationResult {
        match self {
            Self::Write { target, offset, data } => {
                match store.write((*target).into(), usize::from(*offset), data) {
                    Ok(n) => OperationResult::Written(n),
                    Err(e) => OperationResult::Failed(e.kind()),
                }
            },
            Self::Read { target, offset, max_len } => {
                match store.read((*target).into(), usize::from(*offset), usize::from(*max_len)) {
                    Ok(bytes) => OperationResult::Read(bytes.to_vec()),
                    Err(e) => OperationResult::Failed(e.kind()),
                }
            },
        }
    }
}

/// Reference implementation of the key store.
pub struct ModelStore<T: KeyTransform> {
    capacity: usize,
    clear: Vec<u8>,
    black: Vec<u8>,
    transform: T,
}

impl<T: KeyTransform> ModelStore<T> {
    /// Zeroed model with the given capacity.
    pub fn new(capacity: usize, transform: T) -> Self {
        Self { capacity, clear: vec![0; capacity], black: vec![0; capacity], transform }
    }

    /// Raw bytes last written under `resource`.
    pub fn stored(&self, resource: Resource) -> &[u8] {
        match resource {
            Resource::Clear => &self.clear,
            Resource::Black => &self.black,
        }
    }

    /// Apply an operation to the model.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match op {
            Operation::Write { target, offset, data } => {
                self.write((*target).into(), usize::from(*offset), data)
            },
            Operation::Read { target, offset, max_len } => {
                self.read((*target).into(), usize::from(*offset), usize::from(*max_len))
            },
        }
    }

    fn write(&mut self, resource: Resource, offset: usize, data: &[u8]) -> OperationResult {
        if offset > self.capacity {
            return OperationResult::Failed(ErrorKind::OffsetOutOfRange);
        }
        if offset + data.len() > self.capacity {
            return OperationResult::Failed(ErrorKind::BufferOverflow);
        }

        let buffer = match resource {
            Resource::Clear => &mut self.clear,
            Resource::Black => &mut self.black,
        };
        for (i, byte) in data.iter().enumerate() {
            buffer[offset + i] = *byte;
        }

        OperationResult::Written(data.len())
    }

    fn read(&self, resource: Resource, offset: usize, max_len: usize) -> OperationResult {
        let derived = match resource {
            Resource::Clear => self.transform.to_clear(&self.black),
            Resource::Black => self.transform.to_black(&self.clear),
        };
        let Ok(derived) = derived else {
            return OperationResult::Failed(ErrorKind::Transform);
        };

        if offset >= self.capacity {
            return OperationResult::Read(Vec::new());
        }

        let end = (offset + max_len).min(self.capacity);
        OperationResult::Read(derived[offset..end].to_vec())
    }
}
