//! Host configuration.

/// Module parameters for the secure memory host.
///
/// Populated by the binary from command-line arguments. Buffer capacity is
/// not configurable: both attributes are always
/// [`secmem_core::KEY_CAPACITY`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Name announced in lifecycle logs.
    pub name: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { name: "world".to_string() }
    }
}
