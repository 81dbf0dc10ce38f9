use serde::Deserialize;
use std::collections::BTreeMap;

/// Parsed contents of `.air-env.toml`.
///
/// Created once by the loader and never mutated afterwards. Templates in
/// `env` and `secret` stay opaque until the assembler resolves them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    /// Project that owns the secrets. Empty means "not set".
    #[serde(default)]
    pub project_id: String,

    /// Named substitution values (`[param]`).
    #[serde(default, rename = "param")]
    pub parameters: BTreeMap<String, String>,

    /// Plain environment assignments (`[env]`).
    #[serde(default, rename = "env")]
    pub env_entries: BTreeMap<String, String>,

    /// Environment name to secret reference template (`[secret]`).
    #[serde(default, rename = "secret")]
    pub secret_refs: BTreeMap<String, String>,
}

impl ConfigDocument {
    /// The effective project id.
    ///
    /// The top-level `project_id` wins; `param.project_id` is the fallback.
    /// Placeholders, secret-name expansion, the project guard and the
    /// exported project variable all use this one value.
    pub fn project(&self) -> Option<&str> {
        [
            Some(self.project_id.as_str()),
            self.parameters.get("project_id").map(String::as_str),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_param(project_id: &str, param: Option<&str>) -> ConfigDocument {
        ConfigDocument {
            project_id: project_id.to_string(),
            parameters: param
                .map(|p| ("project_id".to_string(), p.to_string()))
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn top_level_project_wins() {
        assert_eq!(with_param("proj1", Some("other")).project(), Some("proj1"));
    }

    #[test]
    fn param_project_is_the_fallback() {
        assert_eq!(with_param("", Some("from-param")).project(), Some("from-param"));
        assert_eq!(with_param("  ", Some(" p ")).project(), Some("p"));
    }

    #[test]
    fn blank_everywhere_is_none() {
        assert_eq!(with_param("", None).project(), None);
        assert_eq!(with_param(" ", Some("")).project(), None);
    }
}
