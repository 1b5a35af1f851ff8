//! Single entry point over the factory and the ratchet.

use chainlock_crypto::{CryptoFactory, Derivation, Hkdf, Key, OsRandom, RandomSource};

use crate::{
    error::RatchetError,
    ratchet::DoubleRatchet,
    session::{Role, Session},
};

/// Facade bundling key handling and the ratchet protocol.
///
/// Callers that only need "make keys, open sessions, encrypt, decrypt" use
/// this instead of wiring [`CryptoFactory`] and [`DoubleRatchet`] together.
#[derive(Debug, Clone)]
pub struct Security<D = Hkdf, R = OsRandom> {
    ratchet: DoubleRatchet<D, R>,
}

impl Default for Security<Hkdf, OsRandom> {
    fn default() -> Self {
        Self::new(CryptoFactory::default())
    }
}

impl<D: Derivation + Clone, R: RandomSource + Clone> Security<D, R> {
    /// Facade over `factory`.
    pub fn new(factory: CryptoFactory<D, R>) -> Self {
        Self { ratchet: DoubleRatchet::new(factory) }
    }

    /// Underlying factory.
    pub fn factory(&self) -> &CryptoFactory<D, R> {
        self.ratchet.factory()
    }

    /// Underlying ratchet.
    pub fn ratchet(&self) -> &DoubleRatchet<D, R> {
        &self.ratchet
    }

    /// Random key of `size` bytes.
    pub fn generate_random_key(&self, size: usize) -> Result<Key, RatchetError> {
        Ok(self.factory().random_key(size)?)
    }

    /// Wrap existing bytes as a key.
    pub fn create_key(&self, bytes: impl Into<Vec<u8>>) -> Key {
        self.factory().key(bytes)
    }

    /// Normalize external key material into a session seed.
    pub fn create_shared_key(&self, bytes: &[u8]) -> Result<Key, RatchetError> {
        Ok(self.factory().shared(bytes)?)
    }

    /// See [`DoubleRatchet::initialize_session`].
    pub fn initialize_session(
        &self,
        shared_secret: &Key,
        role: Role,
    ) -> Result<Session, RatchetError> {
        self.ratchet.initialize_session(shared_secret, role)
    }

    /// See [`DoubleRatchet::encrypt`].
    pub fn encrypt(
        &self,
        session: &mut Session,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, RatchetError> {
        self.ratchet.encrypt(session, plaintext, associated_data)
    }

    /// See [`DoubleRatchet::decrypt`].
    pub fn decrypt(
        &self,
        session: &mut Session,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, RatchetError> {
        self.ratchet.decrypt(session, ciphertext, associated_data)
    }
}
