use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};

use crate::core::errors::{AirEnvError, Result};

/// Reserved variable that receives the project id.
pub const PROJECT_ENV_VAR: &str = "GOOGLE_CLOUD_PROJECT";

/// Where a resolved variable came from. Later sources win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    Project,
    Env,
    Secret,
}

/// The final flat environment produced by the assembler.
///
/// Held by value so the bootstrap can hand it to whoever needs it;
/// `apply` is only for callers that still want it published into the
/// process environment. Secret payloads stay wrapped until exposed.
#[derive(Debug, Default)]
pub struct ResolvedEnvironment {
    pub project_id: Option<String>,
    pub(crate) project_var: Option<String>,
    pub(crate) plain: BTreeMap<String, String>,
    pub(crate) secrets: BTreeMap<String, SecretString>,
}

impl ResolvedEnvironment {
    pub fn new(
        project_id: Option<String>,
        project_var: Option<String>,
        plain: BTreeMap<String, String>,
        secrets: BTreeMap<String, SecretString>,
    ) -> Self {
        Self {
            project_id,
            project_var,
            plain,
            secrets,
        }
    }

    /// Value for `key` after precedence: secret, then plain env, then project.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(secret) = self.secrets.get(key) {
            return Some(secret.expose_secret());
        }
        if let Some(value) = self.plain.get(key) {
            return Some(value);
        }
        match &self.project_var {
            Some(project) if key == PROJECT_ENV_VAR => Some(project),
            _ => None,
        }
    }

    /// Source that supplies the winning value for `key`.
    pub fn source(&self, key: &str) -> Option<Source> {
        if self.secrets.contains_key(key) {
            Some(Source::Secret)
        } else if self.plain.contains_key(key) {
            Some(Source::Env)
        } else if self.project_var.is_some() && key == PROJECT_ENV_VAR {
            Some(Source::Project)
        } else {
            None
        }
    }

    /// Merged view sorted by key, each entry tagged with its source.
    pub fn entries(&self) -> BTreeMap<&str, (&str, Source)> {
        let mut merged = BTreeMap::new();
        if let Some(project) = &self.project_var {
            merged.insert(PROJECT_ENV_VAR, (project.as_str(), Source::Project));
        }
        for (k, v) in &self.plain {
            merged.insert(k.as_str(), (v.as_str(), Source::Env));
        }
        for (k, v) in &self.secrets {
            merged.insert(k.as_str(), (v.expose_secret(), Source::Secret));
        }
        merged
    }

    /// Number of distinct variables after merging.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn secret_count(&self) -> usize {
        self.secrets.len()
    }

    /// Pairs in application order: project var, plain env, secrets.
    ///
    /// Setting them in this order leaves the same result as `entries`.
    pub fn ordered_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::with_capacity(self.plain.len() + self.secrets.len() + 1);
        if let Some(project) = &self.project_var {
            pairs.push((PROJECT_ENV_VAR, project.as_str()));
        }
        pairs.extend(self.plain.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        pairs.extend(
            self.secrets
                .iter()
                .map(|(k, v)| (k.as_str(), v.expose_secret())),
        );
        pairs
    }

    /// Check every name and value before anything is written.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in self.ordered_pairs() {
            validate_var(key, value)?;
        }
        Ok(())
    }

    /// Publish into the process environment.
    ///
    /// All variables are validated first so an invalid name never leaves
    /// the environment half-applied. Must run before any other thread
    /// starts reading the environment.
    pub fn apply(&self) -> Result<()> {
        self.validate()?;
        for (key, value) in self.ordered_pairs() {
            // SAFETY: called during single-threaded startup, before any
            // other thread exists to read or write the environment.
            unsafe { std::env::set_var(key, value) };
        }
        tracing::debug!(count = self.len(), "applied resolved environment");
        Ok(())
    }
}

/// Reject names and values that `std::env::set_var` would panic on.
pub fn validate_var(key: &str, value: &str) -> Result<()> {
    let detail = if key.is_empty() {
        Some("name is empty")
    } else if key.contains('=') {
        Some("name contains '='")
    } else if key.contains('\0') {
        Some("name contains a NUL byte")
    } else if value.contains('\0') {
        Some("value contains a NUL byte")
    } else {
        None
    };

    match detail {
        Some(detail) => Err(AirEnvError::EnvApply {
            key: key.to_string(),
            detail: detail.to_string(),
        }),
        None => Ok(()),
    }
}
