//! # Unseal Core
//! This crate implements the flows needed to unseal a sealed vault from a set
//! of locally configured key shares:
//! - Configuration loading: endpoint plus key shares, shares kept behind `secrecy`
//! - Vault API access: health probe, unseal reset and key submission over HTTP
//! - Quorum selection: pick a threshold-sized random subset of distinct shares
//! - Orchestration: run the whole sequence and stop as soon as the vault opens

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub mod config;
pub mod select;
pub mod unseal;
pub mod vault;

pub use config::Config;
pub use select::select_keys;
pub use unseal::{UnsealOutcome, check, check_threshold, unseal};
pub use vault::{
    HEALTH_PATH, HttpVault, KeyRequest, ResetRequest, SEALED_STATUS, UNSEAL_PATH, UnsealResponse,
    VaultApi, is_sealed_status,
};

/// Errors for configuration loading and vault operations.
/// None of them are retried; callers are expected to abort the run.
#[derive(Debug, Error)]
pub enum UnsealError {
    #[error("failed to read configuration {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to unmarshal configuration: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("invalid vault endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to {action}: {source}")]
    Transport {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to unmarshal response to {action}: {source}")]
    Decode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("vault rejected request to {action} ({status}): {}", errors.join("; "))]
    Api {
        action: &'static str,
        status: StatusCode,
        errors: Vec<String>,
    },
    #[error(
        "there aren't enough keys in the config for proper unsealing: {threshold} needed, {configured} configured"
    )]
    InsufficientKeys { threshold: usize, configured: usize },
    #[error("failed to unseal vault after {attempts} key submissions")]
    Exhausted { attempts: usize },
}
