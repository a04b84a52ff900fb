//! Deterministic seed derivation for the worlds and autopilot of a session.

use sha2::{Digest, Sha256};
use tunnelman_core::Level;

const AUTOPILOT_LABEL: &str = "autopilot";

/// Seed for the world played at `level` on the given attempt of that level.
pub(crate) fn level_seed(session_seed: u64, level: Level, attempt: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(level.get().to_le_bytes());
    hasher.update(attempt.to_le_bytes());
    finalize_seed(hasher)
}

/// Seed for the autopilot key stream, independent of every level seed.
pub(crate) fn autopilot_seed(session_seed: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(AUTOPILOT_LABEL.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
