//! Secure memory attribute host.
//!
//! Exposes a [`secmem_core::KeyStore`] as two file-like attributes, `clear`
//! and `black`, the way a secure-memory driver publishes them to userspace.
//!
//! # Components
//!
//! - [`SecureMemoryHost`]: lifecycle (init/shutdown) and attribute I/O
//! - [`HostConfig`]: module parameters
//! - [`HostError`] / [`Errno`]: failure kinds mapped to negated error codes
//! - [`Command`]: line protocol used by the `secmem` binary

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod error;
mod host;

pub use command::{Command, CommandError, Reply};
pub use config::HostConfig;
pub use error::{Errno, HostError};
pub use host::{ATTRIBUTES, SecureMemoryHost};
