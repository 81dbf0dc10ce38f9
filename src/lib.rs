//! Resolve a process's startup environment from `.air-env.toml`.
//!
//! The file lists plain values and secret references, both of which may use
//! `{name}` placeholders. Secrets are fetched from Google Cloud Secret
//! Manager and win over plain values of the same name.
//!
//! ```no_run
//! let cancel = airenv::CancellationToken::new();
//! airenv::init_environment("", &cancel)?;
//! # Ok::<(), airenv::AirEnvError>(())
//! ```

pub mod adapters;
pub mod config;
pub mod core;

pub use crate::adapters::decoders::toml_decoder::TomlDecoder;
pub use crate::adapters::secrets::gcp_secret_manager::GcpSecretManager;
pub use crate::adapters::secrets::memory_backend::MemorySecretBackend;
pub use crate::core::cancel::CancellationToken;
pub use crate::core::errors::{AirEnvError, Result};
pub use crate::core::models::config_document::ConfigDocument;
pub use crate::core::models::resolved_env::{PROJECT_ENV_VAR, ResolvedEnvironment, Source};
pub use crate::core::services::config_loader::{ConfigLoader, DEFAULT_CONFIG_FILE};
pub use crate::core::services::env_assembler::{AssembleOptions, EnvAssembler};
pub use crate::core::services::placeholder_resolver::{Parameters, PlaceholderResolver};
pub use crate::core::traits::secret_backend::SecretBackend;

/// Resolve `path` (empty = `.air-env.toml`) against `backend`.
///
/// `Ok(None)` means nothing is configured and nothing should change.
pub fn resolve_environment(
    path: &str,
    backend: &dyn SecretBackend,
    options: AssembleOptions,
    cancel: &CancellationToken,
) -> Result<Option<ResolvedEnvironment>> {
    EnvAssembler::new(ConfigLoader::new(&TomlDecoder), backend, options).assemble(path, cancel)
}

/// Resolve the config file with Secret Manager and publish the result into
/// the process environment.
///
/// Call once, synchronously, before any other thread or server starts.
/// A missing file is a successful no-op; every other failure is returned
/// and the environment must be treated as unusable.
pub fn init_environment(path: &str, cancel: &CancellationToken) -> Result<()> {
    let backend = GcpSecretManager::from_env();
    match resolve_environment(path, &backend, AssembleOptions::default(), cancel)? {
        Some(env) => env.apply(),
        None => Ok(()),
    }
}
