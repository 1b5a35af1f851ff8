//! Error types for cryptographic primitives

use thiserror::Error;

/// Errors from key, cipher, derivation and chain operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Ciphertext frame is shorter than the nonce it must start with
    #[error("input too short: got {actual} bytes, need at least {minimum}")]
    InputTooShort {
        /// Length of the supplied input
        actual: usize,
        /// Minimum accepted length
        minimum: usize,
    },

    /// AEAD tag verification failed.
    ///
    /// Wrong key, tampered ciphertext, mismatched associated data and ratchet
    /// desynchronization all end up here and cannot be told apart.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The secure random source could not produce bytes
    #[error("random source exhausted: {reason}")]
    RandomSourceExhausted {
        /// Description reported by the source
        reason: String,
    },

    /// Requested HKDF output exceeds 255 blocks of the hash output
    #[error("derived output too long: requested {requested} bytes, maximum is {maximum}")]
    OutputTooLong {
        /// Requested output length
        requested: usize,
        /// Largest length the hash supports
        maximum: usize,
    },

    /// Key material has the wrong length for the cipher
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length
        expected: usize,
        /// Actual key length
        actual: usize,
    },

    /// Chain index would overflow
    #[error("chain index overflow at {index}")]
    IndexOverflow {
        /// Index of the chain that could not advance
        index: u32,
    },
}

impl CryptoError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Fatal errors mean the process cannot continue to operate securely or
    /// the chain can never advance again. An authentication failure rejects
    /// one frame only: the chain stays where it was and a correct retry
    /// still succeeds.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::RandomSourceExhausted { .. } => true,
            Self::IndexOverflow { .. } => true,

            Self::AuthenticationFailed => false,
            Self::InputTooShort { .. } => false,
            Self::OutputTooLong { .. } => false,
            Self::InvalidKeyLength { .. } => false,
        }
    }
}
