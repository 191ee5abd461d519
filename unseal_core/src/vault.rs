//! Vault system API access: health probe and the stateful unseal endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{UnsealError, config::parse_endpoint};

pub const HEALTH_PATH: &str = "v1/sys/health";
pub const UNSEAL_PATH: &str = "v1/sys/unseal";

/// Health status code a sealed vault answers with.
pub const SEALED_STATUS: u16 = 503;

/// Body clearing any previously submitted shares.
#[derive(Debug, Serialize)]
pub struct ResetRequest {
    pub reset: bool,
}

impl Default for ResetRequest {
    fn default() -> Self {
        Self { reset: true }
    }
}

/// Body submitting one key share.
#[derive(Serialize)]
pub struct KeyRequest<'a> {
    pub key: &'a str,
}

/// UnsealResponse
/// sealed: whether the vault is still sealed
/// threshold: shares required to unseal (`t`)
/// shares: shares the vault was initialized with (`n`)
/// progress: shares accepted so far in the current attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UnsealResponse {
    pub sealed: bool,
    #[serde(rename = "t", default)]
    pub threshold: u32,
    #[serde(rename = "n", default)]
    pub shares: u32,
    #[serde(default)]
    pub progress: u32,
}

/// Error body returned by the vault on rejected requests.
#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

/// The three vault calls an unseal run needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VaultApi: Send + Sync {
    /// Probe health, returning the raw HTTP status code
    async fn health(&self) -> Result<u16, UnsealError>;
    /// Discard any partially submitted shares
    async fn reset(&self) -> Result<UnsealResponse, UnsealError>;
    /// Submit a single key share
    async fn submit_key(&self, key: &str) -> Result<UnsealResponse, UnsealError>;
}

/// HTTP implementation against a live vault
#[derive(Debug, Clone)]
pub struct HttpVault {
    client: Client,
    health_url: Url,
    unseal_url: Url,
}

impl HttpVault {
    /// Build a client for the vault at `endpoint`.
    /// `timeout` applies to every request made through this client.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, UnsealError> {
        let mut base = parse_endpoint(endpoint)?;
        // Url::join drops the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let join = |path: &str| {
            base.join(path)
                .map_err(|e| UnsealError::InvalidEndpoint {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })
        };
        let health_url = join(HEALTH_PATH)?;
        let unseal_url = join(UNSEAL_PATH)?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(UnsealError::HttpClient)?;

        Ok(Self {
            client,
            health_url,
            unseal_url,
        })
    }

    async fn put_unseal<T: Serialize + ?Sized>(
        &self,
        action: &'static str,
        body: &T,
    ) -> Result<UnsealResponse, UnsealError> {
        let response = self
            .client
            .put(self.unseal_url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| UnsealError::Transport { action, source })?;
        decode_unseal(action, response).await
    }
}

async fn decode_unseal(
    action: &'static str,
    response: Response,
) -> Result<UnsealResponse, UnsealError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| UnsealError::Transport { action, source })?;
    debug!(%status, bytes = body.len(), "unseal endpoint replied");

    if !status.is_success() {
        let errors = serde_json::from_slice::<ErrorResponse>(&body)
            .unwrap_or_default()
            .errors;
        return Err(UnsealError::Api {
            action,
            status,
            errors,
        });
    }
    serde_json::from_slice(&body).map_err(|source| UnsealError::Decode { action, source })
}

#[async_trait]
impl VaultApi for HttpVault {
    #[instrument(level = "debug", skip(self), fields(url = %self.health_url))]
    async fn health(&self) -> Result<u16, UnsealError> {
        let response = self
            .client
            .head(self.health_url.clone())
            .send()
            .await
            .map_err(|source| UnsealError::Transport {
                action: "request vault health",
                source,
            })?;
        Ok(response.status().as_u16())
    }

    #[instrument(level = "debug", skip(self))]
    async fn reset(&self) -> Result<UnsealResponse, UnsealError> {
        self.put_unseal("reset unseal state", &ResetRequest::default())
            .await
    }

    #[instrument(level = "debug", skip(self, key))]
    async fn submit_key(&self, key: &str) -> Result<UnsealResponse, UnsealError> {
        self.put_unseal("unseal", &KeyRequest { key }).await
    }
}

/// Whether a health status code means the vault is sealed.
pub fn is_sealed_status(status: u16) -> bool {
    status == SEALED_STATUS
}
