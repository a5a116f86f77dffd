//! Secure Memory Key Staging
//!
//! Two fixed-capacity buffers hold one key in two forms: "clear" (plaintext)
//! and "black" (wrapped). Each is addressed like a small file through
//! offset-based partial reads and writes.
//!
//! # Data Flow
//!
//! Writes land verbatim in the named buffer. Reads never return stored bytes
//! directly: the value served for a resource is computed on demand from the
//! *other* buffer through a [`KeyTransform`].
//!
//! ```text
//! write(Clear) ──► clear.bytes ──► to_black ──► read(Black)
//! write(Black) ──► black.bytes ──► to_clear ──► read(Clear)
//! ```
//!
//! A direct write to `black` is therefore shadowed: `read(Black)` always
//! reflects `to_black(clear.bytes)`.
//!
//! # Bounds
//!
//! - Write: `offset > capacity` is [`BufferError::OffsetOutOfRange`],
//!   `offset + len > capacity` is [`BufferError::BufferOverflow`]
//! - Read: `offset >= capacity` is end-of-buffer (empty, not an error),
//!   otherwise `min(max_len, capacity - offset)` bytes are returned
//!
//! # Concurrency
//!
//! Each buffer sits behind its own mutex. Reads copy the source buffer under
//! its lock and transform the private copy, so a reader never observes a
//! torn write.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod buffer;
pub mod error;
pub mod store;
pub mod transform;

pub use buffer::{KeyBuffer, read_clamped};
pub use error::{BufferError, ErrorKind, KeyStoreError, TransformError};
pub use store::{KeyStore, Resource, UnknownResource};
pub use transform::{Direction, KeyTransform, TransformEngine};

/// Capacity in bytes of both the clear and black buffers.
pub const KEY_CAPACITY: usize = 32;
