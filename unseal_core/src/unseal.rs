//! End-to-end unseal run: health, reset, threshold check, selection, submission.

use rand::Rng;
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::{
    Config, UnsealError,
    select::select_keys,
    vault::{VaultApi, is_sealed_status},
};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsealOutcome {
    /// Health probe reported the vault open, nothing was submitted
    AlreadyUnsealed,
    /// Vault opened after `attempts` key submissions
    Unsealed { attempts: usize },
}

/// Fail fast when fewer shares are configured than the vault requires.
pub fn check_threshold(threshold: usize, configured: usize) -> Result<(), UnsealError> {
    if threshold > configured {
        return Err(UnsealError::InsufficientKeys {
            threshold,
            configured,
        });
    }
    Ok(())
}

/// Report whether the vault is sealed without touching unseal progress.
/// Only the health endpoint is called.
pub async fn check<V>(vault: &V) -> Result<bool, UnsealError>
where
    V: VaultApi + ?Sized,
{
    let status = vault.health().await?;
    let sealed = is_sealed_status(status);
    if sealed {
        info!("vault is sealed");
    } else {
        info!(status, "vault is unsealed");
    }
    Ok(sealed)
}

/// Unseal the vault behind `vault` using shares from `config`.
/// 1. Probes health and returns early unless the vault is sealed.
/// 2. Resets unseal progress so stale shares from an earlier run don't count.
/// 3. Checks enough shares are configured for the reported threshold.
/// 4. Submits a random quorum one share at a time, stopping once unsealed.
/// # Errors
/// Any vault call failure aborts the run. Running out of selected shares
/// while still sealed returns `UnsealError::Exhausted`.
pub async fn unseal<V, R>(
    vault: &V,
    config: &Config,
    rng: &mut R,
) -> Result<UnsealOutcome, UnsealError>
where
    V: VaultApi + ?Sized,
    R: Rng + ?Sized,
{
    let status = vault.health().await?;
    if !is_sealed_status(status) {
        info!(status, "vault seems to be ok. exiting");
        return Ok(UnsealOutcome::AlreadyUnsealed);
    }
    info!("vault is sealed");

    info!("resetting unseal state");
    let state = vault.reset().await?;
    let threshold = state.threshold as usize;
    info!(
        "at least {} keys out of max {} needed, we have {} keys configured",
        state.threshold,
        state.shares,
        config.keys.len()
    );

    check_threshold(threshold, config.keys.len())?;
    let selection = select_keys(rng, config.keys.len(), threshold)?;
    debug!(?selection, "selected key indices");

    for (attempt, &index) in selection.iter().enumerate() {
        let attempt = attempt + 1;
        info!("unseal attempt {attempt}...");
        let response = vault
            .submit_key(config.keys[index].expose_secret())
            .await?;
        if !response.sealed {
            info!("vault unsealed, exiting");
            return Ok(UnsealOutcome::Unsealed { attempts: attempt });
        }
        debug!(
            progress = response.progress,
            threshold = response.threshold,
            "vault still sealed"
        );
    }

    Err(UnsealError::Exhausted {
        attempts: selection.len(),
    })
}
