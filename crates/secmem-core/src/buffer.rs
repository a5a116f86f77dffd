//! Fixed-capacity key buffer with offset-bounded writes.

use std::fmt;

use zeroize::Zeroize;

use crate::error::BufferError;

/// Named byte container of fixed capacity.
///
/// Starts zeroed and is only mutated through [`write`](Self::write), which
/// either applies fully within bounds or not at all. The storage is never
/// resized and is zeroized on drop.
pub struct KeyBuffer {
    name: &'static str,
    bytes: Box<[u8]>,
}

impl KeyBuffer {
    /// Create a zeroed buffer.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        assert!(capacity > 0, "key buffer capacity must be positive");

        Self { name, bytes: vec![0u8; capacity].into_boxed_slice() }
    }

    /// Buffer name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Raw stored bytes, exactly `capacity` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy `data` into the buffer starting at `offset`.
    ///
    /// Returns the number of bytes written (always `data.len()`). An offset
    /// exactly at capacity is accepted for empty data.
    ///
    /// # Errors
    ///
    /// - [`BufferError::OffsetOutOfRange`] if `offset > capacity`
    /// - [`BufferError::BufferOverflow`] if `offset + data.len() > capacity`
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<usize, BufferError> {
        let capacity = self.capacity();

        if offset > capacity {
            return Err(BufferError::OffsetOutOfRange { offset, capacity });
        }

        // offset <= capacity, so the subtraction cannot underflow
        if data.len() > capacity - offset {
            return Err(BufferError::BufferOverflow { offset, len: data.len(), capacity });
        }

        self.bytes[offset..offset + data.len()].copy_from_slice(data);

        debug_assert_eq!(self.bytes.len(), capacity);
        Ok(data.len())
    }

    /// Zero every byte.
    pub fn wipe(&mut self) {
        self.bytes[..].zeroize();
    }
}

impl Drop for KeyBuffer {
    fn drop(&mut self) {
        self.wipe();
    }
}

// Key material stays out of debug output
impl fmt::Debug for KeyBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBuffer")
            .field("name", &self.name)
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// Slice of `source` served by a read at `offset` of at most `max_len` bytes.
///
/// Offsets at or past the end yield an empty slice: end-of-buffer is a normal
/// terminal condition on the read path, unlike the write path.
pub fn read_clamped(source: &[u8], offset: usize, max_len: usize) -> &[u8] {
    if offset >= source.len() {
        return &[];
    }

    let available = source.len() - offset;
    let len = max_len.min(available);

    &source[offset..offset + len]
}
