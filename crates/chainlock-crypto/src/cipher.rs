//! Message encryption using `XChaCha20-Poly1305`
//!
//! Wire format of a sealed message:
//!
//! ```text
//! nonce (24 bytes) || ciphertext || Poly1305 tag (16 bytes)
//! ```
//!
//! Associated data is authenticated but never part of the frame; both
//! sides must supply it identically.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};

use crate::{
    error::CryptoError,
    key::{KEY_SIZE, Key},
    random::{OsRandom, RandomSource},
};

/// `XChaCha20` extended nonce size (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Smallest frame that can carry a valid message (empty plaintext)
pub const MIN_CIPHERTEXT_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Authenticated encryption with associated data.
pub trait Cipher {
    /// Encrypt `plaintext` under `key`, authenticating `associated_data`.
    ///
    /// Returns the complete wire frame.
    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt a wire frame produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// - `InputTooShort`: frame shorter than the nonce
    /// - `AuthenticationFailed`: wrong key, tampered frame or mismatched
    ///   associated data. No plaintext is released.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

/// `XChaCha20-Poly1305` cipher drawing a fresh random nonce per message.
///
/// # Security
///
/// - 192-bit random nonces make accidental reuse under one key negligible
/// - The nonce source MUST be cryptographically secure in production
#[derive(Debug, Clone, Default)]
pub struct AeadCipher<R = OsRandom> {
    random: R,
}

impl<R: RandomSource> AeadCipher<R> {
    /// Create a cipher drawing nonces from `random`.
    pub fn new(random: R) -> Self {
        Self { random }
    }

    fn build(key: &Key) -> Result<XChaCha20Poly1305, CryptoError> {
        XChaCha20Poly1305::new_from_slice(key.as_bytes())
            .map_err(|_| CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: key.len() })
    }
}

impl<R: RandomSource> Cipher for AeadCipher<R> {
    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let cipher = Self::build(key)?;

        let mut nonce = [0u8; NONCE_SIZE];
        self.random.fill(&mut nonce)?;

        let payload = Payload { msg: plaintext, aad: associated_data };
        let Ok(sealed) = cipher.encrypt(XNonce::from_slice(&nonce), payload) else {
            unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
        };

        let mut frame = Vec::with_capacity(NONCE_SIZE + sealed.len());
        frame.extend_from_slice(&nonce);
        frame.extend_from_slice(&sealed);
        Ok(frame)
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &Key,
        associated_data: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < NONCE_SIZE {
            return Err(CryptoError::InputTooShort {
                actual: ciphertext.len(),
                minimum: NONCE_SIZE,
            });
        }

        let cipher = Self::build(key)?;
        let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);
        let payload = Payload { msg: sealed, aad: associated_data };

        cipher
            .decrypt(XNonce::from_slice(nonce), payload)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}
