//! Quorum selection over the configured key shares.

use rand::Rng;

use crate::UnsealError;

/// Pick `threshold` distinct indices in `[0, available)`, in draw order.
/// Draws uniformly and discards repeats until enough indices are collected.
/// The duplicate check is linear per draw, which is fine for the handful of
/// shares a vault is initialized with.
/// # Errors
/// Returns `UnsealError::InsufficientKeys` if `threshold > available`.
pub fn select_keys<R: Rng + ?Sized>(
    rng: &mut R,
    available: usize,
    threshold: usize,
) -> Result<Vec<usize>, UnsealError> {
    if threshold > available {
        return Err(UnsealError::InsufficientKeys {
            threshold,
            configured: available,
        });
    }

    let mut selected = Vec::with_capacity(threshold);
    while selected.len() < threshold {
        let n = rng.gen_range(0..available);
        if !selected.contains(&n) {
            selected.push(n);
        }
    }
    Ok(selected)
}
