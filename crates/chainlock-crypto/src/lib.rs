//! Chainlock Cryptographic Primitives
//!
//! Building blocks for a symmetric-key ratchet: immutable keys, an AEAD
//! cipher, an HKDF and a one-step chain. Randomness is injected through
//! [`RandomSource`] so that nonce-dependent code can run deterministically in
//! tests.
//!
//! # Key Lifecycle
//!
//! ```text
//! Shared Secret
//!        │
//!        ▼ HKDF (session label, index 0..3)
//! Root Key / Chain Key A / Chain Key B
//!        │
//!        ▼ Chain
//! Message Key ──► XChaCha20-Poly1305 ──► nonce || ciphertext || tag
//!        │
//!        ▼ Chain (chain label)
//! Next Chain Key (previous one discarded)
//! ```
//!
//! # Security
//!
//! Forward Secrecy:
//! - Chain keys only move forward through a one-way derivation
//! - Message keys and replaced chain keys are zeroized on drop
//!
//! Authenticity:
//! - XChaCha20-Poly1305 AEAD covers ciphertext and associated data
//! - Failed authentication tag -> reject message, no partial plaintext

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod chain;
pub mod cipher;
pub mod derivation;
pub mod error;
pub mod factory;
pub mod key;
pub mod random;

pub use chain::{CHAIN_KEY_LABEL, Chain, MESSAGE_KEY_LABEL};
pub use cipher::{AeadCipher, Cipher, MIN_CIPHERTEXT_SIZE, NONCE_SIZE, TAG_SIZE};
pub use derivation::{Derivation, HashAlgorithm, Hkdf};
pub use error::CryptoError;
pub use factory::{CryptoFactory, SHARED_SECRET_LABEL};
pub use key::{KEY_SIZE, Key};
pub use random::{OsRandom, RandomSource};
