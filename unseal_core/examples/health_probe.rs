//! # Vault Health Probe Example
//! 1. Read the vault address from `VAULT_ADDR`
//! 2. Probe `/v1/sys/health`
//! 3. Print whether the vault is sealed
use std::time::Duration;

use unseal_core::{HttpVault, SEALED_STATUS, UnsealError, VaultApi};

/// Example health probe main entrypoint
#[tokio::main]
async fn main() -> Result<(), UnsealError> {
    let addr = std::env::var("VAULT_ADDR").unwrap_or_else(|_| "http://127.0.0.1:8200".into());

    let vault = HttpVault::new(&addr, Duration::from_secs(10))?;
    let status = vault.health().await?;
    if status == SEALED_STATUS {
        println!("{addr}: sealed");
    } else {
        println!("{addr}: unsealed (HTTP {status})");
    }
    Ok(())
}
