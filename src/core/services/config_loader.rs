use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::errors::{AirEnvError, Result};
use crate::core::models::config_document::ConfigDocument;
use crate::core::traits::decoder::DocumentDecoder;

/// File read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".air-env.toml";

/// Reads and decodes the declarative config file.
pub struct ConfigLoader<'a> {
    decoder: &'a dyn DocumentDecoder,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(decoder: &'a dyn DocumentDecoder) -> Self {
        Self { decoder }
    }

    /// Path actually read for a caller-supplied `path` (empty = default).
    pub fn effective_path(path: &str) -> PathBuf {
        if path.trim().is_empty() {
            PathBuf::from(DEFAULT_CONFIG_FILE)
        } else {
            PathBuf::from(path)
        }
    }

    /// Load the document at `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist; callers treat that
    /// as "nothing configured".
    ///
    /// # Errors
    ///
    /// - `ConfigRead` for any other I/O failure (permissions, directory, …).
    /// - `ConfigDecode` when the file exists but is not a valid document.
    pub fn load(&self, path: &str) -> Result<Option<ConfigDocument>> {
        let path = Self::effective_path(path);
        self.load_path(&path)
    }

    pub fn load_path(&self, path: &Path) -> Result<Option<ConfigDocument>> {
        let content = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, skipping");
                return Ok(None);
            }
            Err(source) => {
                return Err(AirEnvError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let text = String::from_utf8(content).map_err(|e| AirEnvError::ConfigDecode {
            path: path.to_path_buf(),
            detail: format!("file is not valid UTF-8: {e}"),
        })?;

        let doc = self.decoder.decode(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            params = doc.parameters.len(),
            env = doc.env_entries.len(),
            secrets = doc.secret_refs.len(),
            "loaded config document"
        );
        Ok(Some(doc))
    }
}
