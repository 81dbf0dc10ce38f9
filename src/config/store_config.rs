use secrecy::SecretString;

/// Default Secret Manager REST endpoint.
pub const DEFAULT_SECRET_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// Default metadata server host on GCE / Cloud Run / GKE.
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

pub const ENDPOINT_ENV: &str = "AIRENV_SECRET_ENDPOINT";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const METADATA_HOST_ENV: &str = "GCE_METADATA_HOST";

/// Connection settings for the secret store, read from the environment.
#[derive(Debug)]
pub struct SecretStoreConfig {
    /// Base URL without trailing slash.
    pub endpoint: String,
    /// Base URL of the metadata server, used when no token is given.
    pub metadata_url: String,
    /// Pre-issued OAuth access token.
    pub access_token: Option<SecretString>,
}

impl Default for SecretStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SECRET_ENDPOINT.to_string(),
            metadata_url: format!("http://{DEFAULT_METADATA_HOST}"),
            access_token: None,
        }
    }
}

impl SecretStoreConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let endpoint = get(ENDPOINT_ENV)
            .map(|e| e.trim_end_matches('/').to_string())
            .unwrap_or(defaults.endpoint);

        let metadata_url = get(METADATA_HOST_ENV)
            .map(|host| {
                if host.starts_with("http://") || host.starts_with("https://") {
                    host.trim_end_matches('/').to_string()
                } else {
                    format!("http://{host}")
                }
            })
            .unwrap_or(defaults.metadata_url);

        Self {
            endpoint,
            metadata_url,
            access_token: get(ACCESS_TOKEN_ENV).map(SecretString::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = SecretStoreConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.endpoint, DEFAULT_SECRET_ENDPOINT);
        assert_eq!(cfg.metadata_url, "http://metadata.google.internal");
        assert!(cfg.access_token.is_none());
    }

    #[test]
    fn overrides_are_normalized() {
        let cfg = SecretStoreConfig::from_lookup(lookup(&[
            (ENDPOINT_ENV, "http://localhost:8085/"),
            (METADATA_HOST_ENV, "127.0.0.1:9000"),
            (ACCESS_TOKEN_ENV, " tok "),
        ]));
        assert_eq!(cfg.endpoint, "http://localhost:8085");
        assert_eq!(cfg.metadata_url, "http://127.0.0.1:9000");
        assert_eq!(cfg.access_token.unwrap().expose_secret(), "tok");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg =
            SecretStoreConfig::from_lookup(lookup(&[(ACCESS_TOKEN_ENV, ""), (ENDPOINT_ENV, "  ")]));
        assert!(cfg.access_token.is_none());
        assert_eq!(cfg.endpoint, DEFAULT_SECRET_ENDPOINT);
    }
}
