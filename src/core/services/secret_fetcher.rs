use std::collections::BTreeMap;

use secrecy::SecretString;

use crate::core::cancel::CancellationToken;
use crate::core::errors::Result;
use crate::core::models::secret_ref::SecretRef;
use crate::core::traits::secret_backend::SecretBackend;

/// Fetches every referenced secret through one backend session.
///
/// Sequential and all-or-nothing: the first failure aborts the batch and
/// nothing fetched so far is returned. No retries.
pub struct SecretFetcher<'a> {
    backend: &'a dyn SecretBackend,
}

impl<'a> SecretFetcher<'a> {
    pub fn new(backend: &'a dyn SecretBackend) -> Self {
        Self { backend }
    }

    /// Fetch `refs` (env name → secret version) and return env name → payload.
    ///
    /// No session is opened when `refs` is empty. The session is dropped,
    /// and so released, on every exit path.
    ///
    /// # Errors
    ///
    /// - `Cancelled` if `cancel` fires before or during a fetch.
    /// - Whatever the backend reports for the first failing reference.
    pub fn fetch_all(
        &self,
        refs: &BTreeMap<String, SecretRef>,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, SecretString>> {
        let mut fetched = BTreeMap::new();
        if refs.is_empty() {
            return Ok(fetched);
        }

        cancel.check()?;
        let mut session = self.backend.open(cancel)?;
        tracing::debug!(
            backend = self.backend.name(),
            count = refs.len(),
            "fetching secrets"
        );

        for (env_name, reference) in refs {
            cancel.check()?;
            tracing::debug!(env = %env_name, secret = %reference, "accessing secret");
            let payload = session.access(reference, cancel)?;
            let text = payload_to_text(payload, env_name);
            fetched.insert(env_name.clone(), SecretString::from(text));
        }

        Ok(fetched)
    }
}

/// Secret payloads are treated as text; invalid UTF-8 is replaced.
fn payload_to_text(payload: Vec<u8>, env_name: &str) -> String {
    match String::from_utf8(payload) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(env = %env_name, "secret payload is not valid UTF-8");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
