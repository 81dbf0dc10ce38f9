use std::path::Path;

use crate::core::errors::{AirEnvError, Result};
use crate::core::models::config_document::ConfigDocument;
use crate::core::traits::decoder::DocumentDecoder;

/// Decodes `.air-env.toml` files.
///
/// Schema:
/// - `project_id = "..."` (optional; `param.project_id` is used when empty)
/// - `[param]`, `[env]`, `[secret]` tables of string values (all optional)
///
/// Any other top-level key is rejected. Parameter names may be any TOML
/// key, quoted ones included, as long as they contain no braces.
pub struct TomlDecoder;

impl DocumentDecoder for TomlDecoder {
    fn decode(&self, content: &str, origin: &Path) -> Result<ConfigDocument> {
        toml::from_str(content).map_err(|e| AirEnvError::ConfigDecode {
            path: origin.to_path_buf(),
            detail: e.message().to_string(),
        })
    }
}
