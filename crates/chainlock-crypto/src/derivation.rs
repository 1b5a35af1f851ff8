//! Key derivation using HKDF (RFC 5869)
//!
//! The extract step always runs with a zero salt of hash-output length, so
//! every derivation is bound to the input key alone. Outputs for different
//! purposes are separated purely through the `info` label.

use sha2::{Sha256, Sha512};

use crate::{error::CryptoError, key::Key};

/// Hash function backing the HKDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA-256 (32-byte output)
    #[default]
    Sha256,
    /// SHA-512 (64-byte output)
    Sha512,
}

impl HashAlgorithm {
    /// Hash output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Largest HKDF-Expand output (255 hash blocks).
    pub fn max_output_len(self) -> usize {
        255 * self.output_len()
    }
}

/// Key derivation function.
pub trait Derivation {
    /// Derive `length` bytes from `input_key` under the context `info`.
    ///
    /// A `length` of zero yields an empty key.
    fn derive_key(&self, input_key: &Key, info: &[u8], length: usize) -> Result<Key, CryptoError>;

    /// Derive `num_keys` keys of `length` bytes each.
    ///
    /// Key `i` is `derive_key(input_key, info || u32_be(i), length)`, so the
    /// outputs differ only through the appended index.
    fn derive_keys(
        &self,
        input_key: &Key,
        num_keys: u32,
        info: &[u8],
        length: usize,
    ) -> Result<Vec<Key>, CryptoError> {
        let mut keys = Vec::new();
        let mut key_info = Vec::with_capacity(info.len() + 4);

        for index in 0..num_keys {
            key_info.clear();
            key_info.extend_from_slice(info);
            key_info.extend_from_slice(&index.to_be_bytes());
            keys.push(self.derive_key(input_key, &key_info, length)?);
        }

        Ok(keys)
    }
}

/// HKDF with a configurable hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hkdf {
    algorithm: HashAlgorithm,
}

impl Hkdf {
    /// Create an HKDF over `algorithm`.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Hash algorithm in use.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl Derivation for Hkdf {
    fn derive_key(&self, input_key: &Key, info: &[u8], length: usize) -> Result<Key, CryptoError> {
        let maximum = self.algorithm.max_output_len();
        if length > maximum {
            return Err(CryptoError::OutputTooLong { requested: length, maximum });
        }

        let mut okm = vec![0u8; length];
        let expanded = match self.algorithm {
            HashAlgorithm::Sha256 => {
                let salt = [0u8; 32];
                hkdf::Hkdf::<Sha256>::new(Some(&salt[..]), input_key.as_bytes()).expand(info, &mut okm)
            },
            HashAlgorithm::Sha512 => {
                let salt = [0u8; 64];
                hkdf::Hkdf::<Sha512>::new(Some(&salt[..]), input_key.as_bytes()).expand(info, &mut okm)
            },
        };
        expanded.map_err(|_| CryptoError::OutputTooLong { requested: length, maximum })?;

        Ok(Key::from_bytes(okm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ikm() -> Key {
        Key::from_bytes(*b"test_input_key_material_here____")
    }

    #[test]
    fn rfc5869_test_case_3() {
        // Zero-length salt is equivalent to a salt of HashLen zero bytes
        let ikm = Key::from_bytes([0x0b; 22]);
        let okm = Hkdf::default().derive_key(&ikm, b"", 42).unwrap();

        assert_eq!(
            hex::encode(okm.as_bytes()),
            "8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d9d201395faa4b61a96c8"
        );
    }

    #[test]
    fn derive_produces_requested_length() {
        let kdf = Hkdf::default();
        for length in [1, 16, 32, 33, 64, 100] {
            assert_eq!(kdf.derive_key(&ikm(), b"info", length).unwrap().len(), length);
        }
    }

    #[test]
    fn derive_is_deterministic() {
        let kdf = Hkdf::default();
        let a = kdf.derive_key(&ikm(), b"label", 32).unwrap();
        let b = kdf.derive_key(&ikm(), b"label", 32).unwrap();
        assert_eq!(a, b, "same inputs must produce same output");
    }

    #[test]
    fn different_info_produces_different_keys() {
        let kdf = Hkdf::default();
        let a = kdf.derive_key(&ikm(), b"label-a", 32).unwrap();
        let b = kdf.derive_key(&ikm(), b"label-b", 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn shorter_output_is_prefix_of_longer() {
        let kdf = Hkdf::default();
        let short = kdf.derive_key(&ikm(), b"label", 16).unwrap();
        let long = kdf.derive_key(&ikm(), b"label", 48).unwrap();
        assert_eq!(short.as_bytes(), &long.as_bytes()[..16]);
    }

    #[test]
    fn zero_length_yields_empty_key() {
        let key = Hkdf::default().derive_key(&ikm(), b"label", 0).unwrap();
        assert!(key.is_empty());
    }

    #[test]
    fn zero_keys_yields_empty_list() {
        let keys = Hkdf::default().derive_keys(&ikm(), 0, b"label", 32).unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn too_long_output_is_rejected() {
        let result = Hkdf::default().derive_key(&ikm(), b"", 255 * 32 + 1);
        assert_eq!(result, Err(CryptoError::OutputTooLong { requested: 8161, maximum: 8160 }));

        assert!(Hkdf::default().derive_key(&ikm(), b"", 255 * 32).is_ok());
    }

    #[test]
    fn huge_key_count_fails_on_first_key() {
        let result = Hkdf::default().derive_keys(&ikm(), u32::MAX, b"label", 255 * 32 + 1);
        assert_eq!(result, Err(CryptoError::OutputTooLong { requested: 8161, maximum: 8160 }));
    }

    #[test]
    fn derive_keys_appends_big_endian_index() {
        let kdf = Hkdf::default();
        let keys = kdf.derive_keys(&ikm(), 3, b"label", 32).unwrap();

        assert_eq!(keys.len(), 3);
        for (index, key) in keys.iter().enumerate() {
            let mut info = b"label".to_vec();
            info.extend_from_slice(&(index as u32).to_be_bytes());
            assert_eq!(key, &kdf.derive_key(&ikm(), &info, 32).unwrap());
        }
        assert_ne!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[0], keys[2]);
    }

    #[test]
    fn sha512_differs_from_sha256() {
        let a = Hkdf::new(HashAlgorithm::Sha256).derive_key(&ikm(), b"label", 32).unwrap();
        let b = Hkdf::new(HashAlgorithm::Sha512).derive_key(&ikm(), b"label", 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sha512_allows_longer_output() {
        let kdf = Hkdf::new(HashAlgorithm::Sha512);
        assert_eq!(kdf.algorithm().max_output_len(), 255 * 64);
        assert_eq!(kdf.derive_key(&ikm(), b"", 255 * 64).unwrap().len(), 255 * 64);
    }

    #[test]
    fn works_with_empty_input_key() {
        let key = Hkdf::default().derive_key(&Key::from_bytes(Vec::new()), b"label", 32).unwrap();
        assert_eq!(key.len(), 32);
    }
}
