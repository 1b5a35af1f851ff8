//! Error types for session and ratchet operations

use chainlock_crypto::CryptoError;
use thiserror::Error;

/// Errors from the session layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatchetError {
    /// A cryptographic primitive failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Supplied session identifier is unusable as a lookup key
    #[error("invalid session id: {reason}")]
    InvalidSessionId {
        /// Why the identifier was rejected
        reason: String,
    },
}

impl RatchetError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// See [`CryptoError::is_fatal`]. A rejected session id is a caller error.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Crypto(err) => err.is_fatal(),
            Self::InvalidSessionId { .. } => false,
        }
    }
}
