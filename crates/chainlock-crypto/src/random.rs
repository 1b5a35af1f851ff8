//! Random byte sources.
//!
//! Every component that needs randomness (key generation, AEAD nonces,
//! session ids) takes a [`RandomSource`] instead of reaching for global
//! state. Production code uses [`OsRandom`]; tests plug in deterministic
//! sources.

use crate::error::CryptoError;

/// Source of random bytes.
///
/// # Invariants
///
/// - Production implementations MUST be cryptographically secure
/// - A failure MUST be reported, never papered over with weaker bytes
pub trait RandomSource: Send + Sync {
    /// Fills `buffer` entirely with random bytes.
    fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError>;
}

/// Operating system CSPRNG (getrandom).
///
/// Reads from the platform entropy source (`getrandom(2)` on Linux,
/// `BCryptGenRandom` on Windows). A failing read surfaces as
/// [`CryptoError::RandomSourceExhausted`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::fill(buffer)
            .map_err(|err| CryptoError::RandomSourceExhausted { reason: err.to_string() })
    }
}
