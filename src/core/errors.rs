use std::path::PathBuf;

/// All domain errors for airenv.
///
/// A missing config file is deliberately absent from this list: the
/// loader reports it as `Ok(None)` and startup continues untouched.
#[derive(Debug, thiserror::Error)]
pub enum AirEnvError {
    #[error(
        "Failed to decode {path}: {detail}\n\n  \
         Expected format:\n    \
         project_id = \"my-project\"\n    \
         [param]  name = \"value\"\n    \
         [env]    KEY = \"value or {{placeholder}}\"\n    \
         [secret] KEY = \"secret-name\""
    )]
    ConfigDecode { path: PathBuf, detail: String },

    #[error("Failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Invalid secret reference for {name}: '{reference}'\n\n  \
         {detail}\n  \
         Use a bare secret name (requires project_id) or a full name like\n    \
         projects/<project>/secrets/<name>/versions/latest"
    )]
    InvalidSecretReference {
        name: String,
        reference: String,
        detail: String,
    },

    #[error(
        "Could not connect to the secret store: {detail}\n\n  \
         Check network access and credentials:\n    \
         → Set GOOGLE_OAUTH_ACCESS_TOKEN, or run on a host with a metadata server\n    \
         → Set AIRENV_SECRET_ENDPOINT when using an emulator"
    )]
    SecretConnection { detail: String },

    #[error(
        "Access denied to secret '{name}'\n\n  \
         The current identity lacks secretmanager.versions.access on this secret."
    )]
    SecretAccessDenied { name: String },

    #[error("Secret '{name}' not found (or it has no enabled version)")]
    SecretNotFound { name: String },

    #[error("Secret store returned {status} for '{name}': {detail}")]
    SecretBackend {
        name: String,
        status: u16,
        detail: String,
    },

    #[error("Environment resolution cancelled")]
    Cancelled,

    #[error("Cannot set environment variable '{key}': {detail}")]
    EnvApply { key: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AirEnvError>;
