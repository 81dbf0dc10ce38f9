use std::fmt;

use crate::core::errors::{AirEnvError, Result};

/// Fully qualified name of a secret version,
/// `projects/<project>/secrets/<secret>/versions/<version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub project: String,
    pub secret: String,
    pub version: String,
}

impl SecretRef {
    /// Build a reference from a placeholder-resolved template.
    ///
    /// Accepted forms:
    /// - `projects/<p>/secrets/<s>/versions/<v>` (used verbatim)
    /// - `secrets/<s>/versions/<v>` or `<s>/versions/<v>` (project prefixed)
    /// - `<s>` (project prefixed, version `latest`)
    ///
    /// `env_name` is only used for error messages.
    pub fn parse(env_name: &str, reference: &str, project_id: Option<&str>) -> Result<Self> {
        let invalid = |detail: &str| AirEnvError::InvalidSecretReference {
            name: env_name.to_string(),
            reference: reference.to_string(),
            detail: detail.to_string(),
        };

        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(invalid("The reference is empty."));
        }
        if trimmed.contains('{') || trimmed.contains('}') {
            return Err(invalid(
                "The reference still contains an unresolved {placeholder}.",
            ));
        }

        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("The reference contains an empty path segment."));
        }

        let (project, secret, version) = match parts.as_slice() {
            ["projects", project, "secrets", secret, "versions", version] => {
                (project.to_string(), *secret, *version)
            }
            ["secrets", secret, "versions", version] | [secret, "versions", version] => {
                let project = Self::require_project(project_id)
                    .ok_or_else(|| invalid("A short reference needs project_id to be set."))?;
                (project, *secret, *version)
            }
            [secret] => (
                Self::require_project(project_id)
                    .ok_or_else(|| invalid("A bare secret name needs project_id to be set."))?,
                *secret,
                "latest",
            ),
            _ => return Err(invalid("Unrecognized reference layout.")),
        };

        Ok(Self {
            project,
            secret: secret.to_string(),
            version: version.to_string(),
        })
    }

    fn require_project(project_id: Option<&str>) -> Option<String> {
        project_id
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/secrets/{}/versions/{}",
            self.project, self.secret, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_expands_to_latest_version() {
        let r = SecretRef::parse("PARAM_AUTH", "auth-token", Some("proj1")).unwrap();
        assert_eq!(
            r.to_string(),
            "projects/proj1/secrets/auth-token/versions/latest"
        );
    }

    #[test]
    fn full_name_is_used_verbatim() {
        let full = "projects/other/secrets/db-pass/versions/3";
        let r = SecretRef::parse("DB_PASS", full, Some("proj1")).unwrap();
        assert_eq!(r.project, "other");
        assert_eq!(r.version, "3");
        assert_eq!(r.to_string(), full);
    }

    #[test]
    fn full_name_does_not_need_project() {
        let full = "projects/other/secrets/db-pass/versions/latest";
        assert!(SecretRef::parse("DB_PASS", full, None).is_ok());
    }

    #[test]
    fn short_forms_get_project_prefix() {
        let a = SecretRef::parse("A", "secrets/api/versions/2", Some("p")).unwrap();
        let b = SecretRef::parse("B", "api/versions/2", Some("p")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "projects/p/secrets/api/versions/2");
    }

    #[test]
    fn bare_name_without_project_fails() {
        let err = SecretRef::parse("TOKEN", "auth-token", None).unwrap_err();
        assert!(err.to_string().contains("project_id"));

        let err = SecretRef::parse("TOKEN", "auth-token", Some("  ")).unwrap_err();
        assert!(matches!(err, AirEnvError::InvalidSecretReference { .. }));
    }

    #[test]
    fn unresolved_placeholder_fails() {
        let err = SecretRef::parse("TOKEN", "{missing}-token", Some("p")).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn malformed_layouts_fail() {
        for bad in ["", "a//b", "projects/p/secrets/s", "x/y"] {
            assert!(
                SecretRef::parse("K", bad, Some("p")).is_err(),
                "expected '{bad}' to be rejected"
            );
        }
    }
}
