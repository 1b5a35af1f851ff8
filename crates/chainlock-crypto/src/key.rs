//! Immutable key material with constant-time comparison.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::{error::CryptoError, random::RandomSource};

/// Default key size in bytes (256-bit keys)
pub const KEY_SIZE: usize = 32;

/// Raw key bytes.
///
/// The bytes are stored exactly as given, never padded or truncated.
/// Equality runs in constant time for equal-length keys, and the bytes are
/// zeroized when the key is dropped.
#[derive(Clone)]
pub struct Key {
    bytes: Vec<u8>,
}

impl Key {
    /// Generate `size` bytes from a secure random source.
    pub fn random<R: RandomSource + ?Sized>(size: usize, random: &R) -> Result<Self, CryptoError> {
        let mut bytes = vec![0u8; size];
        random.fill(&mut bytes)?;
        Ok(Self { bytes })
    }

    /// Wrap existing bytes verbatim.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length key.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Constant-time equality.
    ///
    /// Keys of different lengths compare unequal. For equal lengths the
    /// running time does not depend on where the first differing byte is.
    pub fn equals(&self, other: &Key) -> bool {
        self.bytes.as_slice().ct_eq(other.bytes.as_slice()).into()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Key {}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key").field("len", &self.bytes.len()).finish_non_exhaustive()
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
