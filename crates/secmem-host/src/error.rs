//! Host error types and their error codes.

use std::fmt;

use secmem_core::{ErrorKind, KeyStoreError};
use thiserror::Error;

/// Errors returned by attribute I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Attribute name is not registered.
    #[error("no such attribute: {0}")]
    NoSuchAttribute(String),

    /// Host has been shut down and its attributes unregistered.
    #[error("secure memory host is shut down")]
    ShutDown,

    /// Key store rejected the operation.
    #[error(transparent)]
    Store(#[from] KeyStoreError),
}

impl HostError {
    /// Error code reported to the caller.
    pub fn errno(&self) -> Errno {
        match self {
            Self::NoSuchAttribute(_) => Errno::NoEnt,
            Self::ShutDown => Errno::NoDev,
            Self::Store(e) => match e.kind() {
                ErrorKind::OffsetOutOfRange => Errno::FBig,
                ErrorKind::BufferOverflow => Errno::NoSpc,
                ErrorKind::Transform => Errno::Io,
            },
        }
    }
}

/// POSIX error codes used by attribute handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Errno {
    /// No such file or directory
    NoEnt,
    /// I/O error
    Io,
    /// No such device
    NoDev,
    /// File too large
    FBig,
    /// No space left on device
    NoSpc,
}

impl Errno {
    /// Positive error number.
    pub fn code(self) -> i32 {
        match self {
            Self::NoEnt => 2,
            Self::Io => 5,
            Self::NoDev => 19,
            Self::FBig => 27,
            Self::NoSpc => 28,
        }
    }

    /// Negated error number, as returned by an attribute handler.
    pub fn as_return(self) -> i32 {
        -self.code()
    }

    /// Symbolic name.
    pub fn name(self) -> &'static str {
        match self {
            Self::NoEnt => "ENOENT",
            Self::Io => "EIO",
            Self::NoDev => "ENODEV",
            Self::FBig => "EFBIG",
            Self::NoSpc => "ENOSPC",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_return())
    }
}
