//! One step of a forward-secure symmetric chain
//!
//! # Security Properties
//!
//! - Forward Secrecy: a chain key cannot be recovered from its successor
//! - Key Independence: message keys and chain keys use distinct labels
//! - Determinism: the same key always yields the same message key and
//!   successor

use std::cell::OnceCell;

use crate::{derivation::Derivation, error::CryptoError, key::Key};

/// Label for deriving a message key
pub const MESSAGE_KEY_LABEL: &[u8] = b"chainlockMessageKeyV1";

/// Label for deriving the next chain key
pub const CHAIN_KEY_LABEL: &[u8] = b"chainlockChainKeyV1";

/// Length of message keys and chain keys
const DERIVED_KEY_SIZE: usize = 32;

/// Immutable node of a key-derivation chain.
///
/// Index 0 is the seed; index `n` is only reachable through `n` sequential
/// derivations. Advancing produces a new chain and never mutates this one.
/// The message key and successor are computed on first access and cached.
pub struct Chain<D> {
    key: Key,
    kdf: D,
    index: u32,
    message_key: OnceCell<Key>,
    next: OnceCell<Box<Chain<D>>>,
}

impl<D: Derivation + Clone> Chain<D> {
    /// Create a chain node holding `key` at position `index`.
    pub fn new(key: Key, kdf: D, index: u32) -> Self {
        Self { key, kdf, index, message_key: OnceCell::new(), next: OnceCell::new() }
    }

    /// Current chain key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Position of this node in the chain.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// New chain with `key` at the same index.
    ///
    /// Seeds a chain from stored state; it does not advance.
    pub fn with_key(&self, key: Key) -> Self {
        Self::new(key, self.kdf.clone(), self.index)
    }

    /// Message key for this node.
    pub fn message_key(&self) -> Result<&Key, CryptoError> {
        if let Some(key) = self.message_key.get() {
            return Ok(key);
        }

        let derived = self.kdf.derive_key(&self.key, MESSAGE_KEY_LABEL, DERIVED_KEY_SIZE)?;
        Ok(self.message_key.get_or_init(|| derived))
    }

    /// Successor node at `index + 1`.
    pub fn next_chain(&self) -> Result<&Chain<D>, CryptoError> {
        if let Some(next) = self.next.get() {
            return Ok(&**next);
        }

        let derived = self.derive_next()?;
        Ok(&**self.next.get_or_init(|| Box::new(derived)))
    }

    /// Consume this node and return its successor.
    ///
    /// The current key is dropped (and zeroized) along with `self`.
    pub fn advance(mut self) -> Result<Chain<D>, CryptoError> {
        match self.next.take() {
            Some(next) => Ok(*next),
            None => self.derive_next(),
        }
    }

    /// Consume the node, keeping only its key.
    pub fn into_key(self) -> Key {
        self.key
    }

    fn derive_next(&self) -> Result<Chain<D>, CryptoError> {
        let index = self
            .index
            .checked_add(1)
            .ok_or(CryptoError::IndexOverflow { index: self.index })?;
        let key = self.kdf.derive_key(&self.key, CHAIN_KEY_LABEL, DERIVED_KEY_SIZE)?;

        Ok(Self::new(key, self.kdf.clone(), index))
    }
}
