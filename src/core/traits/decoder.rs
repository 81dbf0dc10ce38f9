use crate::core::errors::Result;
use crate::core::models::config_document::ConfigDocument;

/// Port for decoding the raw config file into a `ConfigDocument`.
///
/// Only `TomlDecoder` ships today; the trait keeps the file format
/// swappable without touching the loader.
pub trait DocumentDecoder: Send + Sync {
    /// Decode raw file content. `origin` names the source in error messages.
    fn decode(&self, content: &str, origin: &std::path::Path) -> Result<ConfigDocument>;
}
