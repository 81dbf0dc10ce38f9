use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::store_config::SecretStoreConfig;
use crate::core::cancel::CancellationToken;
use crate::core::errors::{AirEnvError, Result};
use crate::core::models::secret_ref::SecretRef;
use crate::core::traits::secret_backend::{SecretBackend, SecretSession};

const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// Longest error body quoted back to the user.
const MAX_ERROR_BODY: usize = 200;

/// Google Cloud Secret Manager over its REST API.
///
/// Blocking: each session owns a current-thread tokio runtime and drives
/// reqwest on it, so callers must not already be inside a runtime.
/// No client timeout is configured and failed requests are not retried.
pub struct GcpSecretManager {
    config: SecretStoreConfig,
}

impl GcpSecretManager {
    pub fn new(config: SecretStoreConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(SecretStoreConfig::from_env())
    }
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

fn connection_error(detail: impl std::fmt::Display) -> AirEnvError {
    AirEnvError::SecretConnection {
        detail: detail.to_string(),
    }
}

/// Run `fut` on `rt`, giving up as soon as `cancel` fires.
fn block_on_cancellable<T>(
    rt: &tokio::runtime::Runtime,
    cancel: &CancellationToken,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    rt.block_on(async {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AirEnvError::Cancelled),
            result = fut => result,
        }
    })
}

impl SecretBackend for GcpSecretManager {
    fn open(&self, cancel: &CancellationToken) -> Result<Box<dyn SecretSession + '_>> {
        cancel.check()?;

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| connection_error(format!("failed to create async runtime: {e}")))?;

        let client = reqwest::Client::builder()
            .user_agent(format!("airenv/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| connection_error(format!("failed to create HTTP client: {e}")))?;

        let token = match &self.config.access_token {
            Some(token) => token.expose_secret().to_string(),
            None => {
                tracing::debug!(
                    url = %self.config.metadata_url,
                    "requesting token from metadata server"
                );
                let metadata = fetch_metadata_token(&client, &self.config.metadata_url);
                block_on_cancellable(&rt, cancel, metadata)?
            }
        };

        Ok(Box::new(GcpSession {
            rt,
            client,
            endpoint: &self.config.endpoint,
            token: SecretString::from(token),
        }))
    }

    fn name(&self) -> &str {
        "gcp"
    }
}

async fn fetch_metadata_token(client: &reqwest::Client, metadata_url: &str) -> Result<String> {
    let resp = client
        .get(format!("{metadata_url}{METADATA_TOKEN_PATH}"))
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| connection_error(format!("metadata server unreachable: {e}")))?;

    if !resp.status().is_success() {
        return Err(connection_error(format!(
            "metadata server returned {}",
            resp.status()
        )));
    }

    let token: MetadataToken = resp
        .json()
        .await
        .map_err(|e| connection_error(format!("invalid metadata token response: {e}")))?;
    Ok(token.access_token)
}

/// Authenticated handle; runtime and connection pool are released on drop.
struct GcpSession<'a> {
    rt: tokio::runtime::Runtime,
    client: reqwest::Client,
    endpoint: &'a str,
    token: SecretString,
}

impl GcpSession<'_> {
    async fn access_version(&self, reference: &SecretRef) -> Result<Vec<u8>> {
        let name = reference.to_string();
        let url = format!("{}/v1/{name}:access", self.endpoint);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| connection_error(format!("request for {name} failed: {e}")))?;

        let status = resp.status();
        match status.as_u16() {
            200..=299 => {}
            401 | 403 => return Err(AirEnvError::SecretAccessDenied { name }),
            404 => return Err(AirEnvError::SecretNotFound { name }),
            code => {
                let body = resp.text().await.unwrap_or_default();
                let detail: String = body.chars().take(MAX_ERROR_BODY).collect();
                return Err(AirEnvError::SecretBackend {
                    name,
                    status: code,
                    detail,
                });
            }
        }

        let body: AccessResponse = resp.json().await.map_err(|e| AirEnvError::SecretBackend {
            name: name.clone(),
            status: status.as_u16(),
            detail: format!("invalid response body: {e}"),
        })?;

        let data = body.payload.map(|p| p.data).unwrap_or_default();
        STANDARD
            .decode(data.as_bytes())
            .map_err(|e| AirEnvError::SecretBackend {
                name,
                status: status.as_u16(),
                detail: format!("payload is not valid base64: {e}"),
            })
    }
}

impl SecretSession for GcpSession<'_> {
    fn access(&mut self, reference: &SecretRef, cancel: &CancellationToken) -> Result<Vec<u8>> {
        cancel.check()?;
        block_on_cancellable(&self.rt, cancel, self.access_version(reference))
    }
}
