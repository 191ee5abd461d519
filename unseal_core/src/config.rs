//! Configuration file handling.
//! The file is a JSON object `{ "endpoint": "...", "keys": ["...", ...] }`,
//! read once at startup.

use std::{fs, path::Path};

use reqwest::Url;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use tracing::debug;
use zeroize::Zeroizing;

use crate::UnsealError;

/// Unsealer configuration
/// #Elements
/// endpoint: vault base URL, e.g. `https://vault.internal:8200`
/// keys: unseal key shares, in file order
#[derive(Debug, Deserialize)]
pub struct Config {
    pub endpoint: String,
    #[serde(deserialize_with = "deserialize_keys")]
    pub keys: Vec<SecretString>,
}

fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(SecretString::from).collect())
}

impl Config {
    /// Read and parse the configuration file at `path`.
    /// The raw file buffer holds every share in plaintext, so it is wiped once parsed.
    pub fn load(path: &Path) -> Result<Self, UnsealError> {
        let raw = fs::read_to_string(path)
            .map(Zeroizing::new)
            .map_err(|source| UnsealError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_json(&raw)?;
        debug!(path = %path.display(), keys = config.keys.len(), "configuration loaded");
        Ok(config)
    }

    /// Parse a configuration document and validate its endpoint.
    pub fn from_json(raw: &str) -> Result<Self, UnsealError> {
        let config: Config = serde_json::from_str(raw).map_err(UnsealError::ConfigParse)?;
        config.endpoint_url()?;
        Ok(config)
    }

    /// Endpoint as a URL. Only absolute http(s) URLs are accepted.
    pub fn endpoint_url(&self) -> Result<Url, UnsealError> {
        parse_endpoint(&self.endpoint)
    }
}

pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, UnsealError> {
    let invalid = |reason: String| UnsealError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}
