use crate::core::cancel::CancellationToken;
use crate::core::errors::Result;
use crate::core::models::secret_ref::SecretRef;

/// Port for the external secret store.
///
/// Implementations live in `adapters::secrets` (e.g. GcpSecretManager,
/// MemorySecretBackend). The core layer only depends on this trait.
pub trait SecretBackend: Send + Sync {
    /// Open an authenticated session. The session is released when dropped.
    fn open(&self, cancel: &CancellationToken) -> Result<Box<dyn SecretSession + '_>>;

    /// Human-readable name of this backend (e.g. "gcp", "memory").
    fn name(&self) -> &str;
}

/// A scoped handle to the secret store, valid until dropped.
pub trait SecretSession {
    /// Fetch the raw payload of one secret version.
    fn access(&mut self, reference: &SecretRef, cancel: &CancellationToken) -> Result<Vec<u8>>;
}
