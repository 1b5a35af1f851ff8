//! Consistent construction of keys, ciphers, derivations and chains.

use crate::{
    chain::Chain,
    cipher::AeadCipher,
    derivation::{Derivation, Hkdf},
    error::CryptoError,
    key::{KEY_SIZE, Key},
    random::{OsRandom, RandomSource},
};

/// Label used to normalize external key material into a session seed
pub const SHARED_SECRET_LABEL: &[u8] = b"chainlockSharedSecretV1";

/// Builds every primitive over one derivation and one random source.
///
/// All chains handed out share the same KDF, and the cipher draws its nonces
/// from the same source as key generation.
#[derive(Debug, Clone)]
pub struct CryptoFactory<D = Hkdf, R = OsRandom> {
    kdf: D,
    random: R,
}

impl<D: Derivation + Clone> CryptoFactory<D, OsRandom> {
    /// Factory over `kdf` using the operating system RNG.
    pub fn new(kdf: D) -> Self {
        Self { kdf, random: OsRandom }
    }
}

impl Default for CryptoFactory<Hkdf, OsRandom> {
    fn default() -> Self {
        Self::new(Hkdf::default())
    }
}

impl<D: Derivation + Clone, R: RandomSource + Clone> CryptoFactory<D, R> {
    /// Factory over `kdf` drawing randomness from `random`.
    pub fn with_random(kdf: D, random: R) -> Self {
        Self { kdf, random }
    }

    /// Random key of `size` bytes.
    pub fn random_key(&self, size: usize) -> Result<Key, CryptoError> {
        Key::random(size, &self.random)
    }

    /// Wrap existing bytes as a key.
    pub fn key(&self, bytes: impl Into<Vec<u8>>) -> Key {
        Key::from_bytes(bytes)
    }

    /// AEAD cipher sharing this factory's random source.
    pub fn cipher(&self) -> AeadCipher<R> {
        AeadCipher::new(self.random.clone())
    }

    /// The derivation every chain uses.
    pub fn kdf(&self) -> &D {
        &self.kdf
    }

    /// The random source.
    pub fn random(&self) -> &R {
        &self.random
    }

    /// Chain node over `key` at `index`.
    pub fn chain(&self, key: Key, index: u32) -> Chain<D> {
        Chain::new(key, self.kdf.clone(), index)
    }

    /// Normalize external key material (e.g. a key agreement output) into a
    /// session seed.
    ///
    /// Raw external bytes are never used directly as a key.
    pub fn shared(&self, bytes: &[u8]) -> Result<Key, CryptoError> {
        self.kdf.derive_key(&Key::from_bytes(bytes), SHARED_SECRET_LABEL, KEY_SIZE)
    }
}
