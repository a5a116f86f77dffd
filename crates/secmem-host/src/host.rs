//! Secure memory host lifecycle and attribute handlers.

#![allow(clippy::disallowed_types, reason = "Synchronous registration state only")]

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use secmem_core::{ErrorKind, KeyStore, KeyTransform, Resource, UnknownResource};
use zeroize::Zeroizing;

use crate::{config::HostConfig, error::HostError};

/// Attribute names registered by the host, in registration order.
pub const ATTRIBUTES: [&str; 2] = [Resource::Clear.name(), Resource::Black.name()];

/// Secure memory host exposing the key store as `clear` and `black`
/// attributes.
///
/// Owns its [`KeyStore`]; nothing else holds a reference to the buffers.
/// [`init`](Self::init) registers the attributes and
/// [`shutdown`](Self::shutdown) unregisters them and wipes both buffers.
/// Shutdown also runs on drop and happens at most once.
///
/// Attribute I/O holds the registration read lock for the whole call and
/// shutdown takes the write lock, so shutdown waits for in-flight handlers
/// and nothing lands in the store after the wipe.
pub struct SecureMemoryHost {
    config: HostConfig,
    keys: KeyStore,
    registered: RwLock<bool>,
}

impl SecureMemoryHost {
    /// Create the key store and register both attributes.
    pub fn init(config: HostConfig, transform: impl KeyTransform) -> Self {
        let keys = KeyStore::new(transform);

        tracing::info!("Hello {} from the secure memory module", config.name);
        for attribute in ATTRIBUTES {
            tracing::debug!(attribute, capacity = keys.capacity(), "attribute registered");
        }

        Self { config, keys, registered: RwLock::new(true) }
    }

    /// Module parameters the host was started with.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Size of each attribute in bytes.
    pub fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    /// Whether attributes are currently registered.
    pub fn is_registered(&self) -> bool {
        *self.registration()
    }

    /// Registered attribute names. Empty after shutdown.
    pub fn attributes(&self) -> &'static [&'static str] {
        if self.is_registered() { &ATTRIBUTES } else { &[] }
    }

    /// Attribute write handler: store `data` at `offset`.
    ///
    /// Returns the number of bytes consumed.
    pub fn store(&self, attribute: &str, offset: usize, data: &[u8]) -> Result<usize, HostError> {
        let registered = self.registration();
        let resource = resolve(*registered, attribute)?;

        Ok(self.keys.write(resource, offset, data)?)
    }

    /// Attribute read handler: up to `count` bytes starting at `offset`.
    ///
    /// An empty result is end-of-file.
    pub fn show(
        &self,
        attribute: &str,
        offset: usize,
        count: usize,
    ) -> Result<Zeroizing<Vec<u8>>, HostError> {
        let registered = self.registration();
        let resource = resolve(*registered, attribute)?;

        match self.keys.read(resource, offset, count) {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                if e.kind() == ErrorKind::Transform {
                    tracing::error!(attribute, "cannot {}: {e}", resource.read_direction().verb());
                }
                Err(e.into())
            },
        }
    }

    /// Zero both buffers.
    pub fn wipe(&self) -> Result<(), HostError> {
        let registered = self.registration();
        if !*registered {
            return Err(HostError::ShutDown);
        }

        self.keys.wipe();
        Ok(())
    }

    /// Unregister attributes and wipe key material. Idempotent.
    pub fn shutdown(&self) {
        let mut registered = self.registered.write().unwrap_or_else(PoisonError::into_inner);
        if !*registered {
            return;
        }
        *registered = false;

        for attribute in ATTRIBUTES.iter().rev() {
            tracing::debug!(attribute, "attribute unregistered");
        }
        self.keys.wipe();

        tracing::info!("Goodbye {} from the secure memory module", self.config.name);
    }

    // A poisoned guard still holds a plain flag
    fn registration(&self) -> RwLockReadGuard<'_, bool> {
        self.registered.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve(registered: bool, attribute: &str) -> Result<Resource, HostError> {
    if !registered {
        return Err(HostError::ShutDown);
    }

    attribute.parse::<Resource>().map_err(|UnknownResource(name)| HostError::NoSuchAttribute(name))
}

impl Drop for SecureMemoryHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SecureMemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureMemoryHost")
            .field("config", &self.config)
            .field("registered", &self.is_registered())
            .finish_non_exhaustive()
    }
}
