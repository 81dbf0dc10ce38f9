use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::cancel::CancellationToken;
use crate::core::errors::{AirEnvError, Result};
use crate::core::models::secret_ref::SecretRef;
use crate::core::traits::secret_backend::{SecretBackend, SecretSession};

/// In-memory secret store for tests and local runs.
///
/// Keys are full version names (`projects/p/secrets/s/versions/v`).
/// Every access and every session open/close is recorded.
#[derive(Default)]
pub struct MemorySecretBackend {
    secrets: HashMap<String, Vec<u8>>,
    denied: HashSet<String>,
    open_error: Option<String>,
    cancel_trigger: Option<(String, CancellationToken)>,
    accessed: Mutex<Vec<String>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl MemorySecretBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: &str, payload: impl Into<Vec<u8>>) -> Self {
        self.secrets.insert(name.to_string(), payload.into());
        self
    }

    /// Accessing `name` fails with `SecretAccessDenied`.
    pub fn with_denied(mut self, name: &str) -> Self {
        self.denied.insert(name.to_string());
        self
    }

    /// Opening a session fails with `SecretConnection`.
    pub fn failing_open(mut self, detail: &str) -> Self {
        self.open_error = Some(detail.to_string());
        self
    }

    /// Cancel `token` right after `name` has been served.
    pub fn cancel_after_access(mut self, name: &str, token: CancellationToken) -> Self {
        self.cancel_trigger = Some((name.to_string(), token));
        self
    }

    /// Names accessed so far, in order.
    pub fn accessed(&self) -> Vec<String> {
        self.accessed
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl SecretBackend for MemorySecretBackend {
    fn open(&self, cancel: &CancellationToken) -> Result<Box<dyn SecretSession + '_>> {
        cancel.check()?;
        if let Some(detail) = &self.open_error {
            return Err(AirEnvError::SecretConnection {
                detail: detail.clone(),
            });
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession { backend: self }))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

struct MemorySession<'a> {
    backend: &'a MemorySecretBackend,
}

impl SecretSession for MemorySession<'_> {
    fn access(&mut self, reference: &SecretRef, cancel: &CancellationToken) -> Result<Vec<u8>> {
        cancel.check()?;
        let name = reference.to_string();
        if let Ok(mut accessed) = self.backend.accessed.lock() {
            accessed.push(name.clone());
        }

        if self.backend.denied.contains(&name) {
            return Err(AirEnvError::SecretAccessDenied { name });
        }
        let payload = self
            .backend
            .secrets
            .get(&name)
            .cloned()
            .ok_or_else(|| AirEnvError::SecretNotFound { name: name.clone() })?;

        if let Some((trigger, token)) = &self.backend.cancel_trigger
            && *trigger == name
        {
            token.cancel();
        }
        Ok(payload)
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        self.backend.closed.fetch_add(1, Ordering::SeqCst);
    }
}
