//! Session initialization and the per-message ratchet protocol
//!
//! Only the symmetric chains ratchet. There is no Diffie-Hellman step, so a
//! compromised chain key exposes every later message in that direction until
//! the session is re-initialized (no break-in recovery). Messages must be
//! decrypted in the order they were encrypted: there is no cache of skipped
//! message keys.
//!
//! # Protocol
//!
//! ```text
//! initialize: HKDF(shared, 3 keys) -> [root, A, B]
//!             initiator: send=A recv=B   responder: send=B recv=A
//!
//! encrypt:    chain(send) -> message key -> AEAD -> send = next(send)
//! decrypt:    chain(recv) -> message key -> AEAD -> recv = next(recv)
//! ```
//!
//! A failed decrypt leaves the receiving chain where it was.

use chainlock_crypto::{
    AeadCipher, Cipher, CryptoFactory, Derivation, Hkdf, KEY_SIZE, Key, OsRandom, RandomSource,
};

use crate::{
    error::RatchetError,
    session::{ReceivingChain, Role, SendingChain, Session},
};

/// Label for deriving the initial session keys from the shared secret
pub const SESSION_INIT_LABEL: &[u8] = b"chainlockSessionInitV1";

/// Number of keys derived at initialization (root, chain A, chain B)
const SESSION_KEY_COUNT: u32 = 3;

/// Symmetric ratchet protocol.
///
/// Holds the factory and one cipher; owns no session state, so one instance
/// can serve any number of sessions.
#[derive(Debug, Clone)]
pub struct DoubleRatchet<D = Hkdf, R = OsRandom> {
    factory: CryptoFactory<D, R>,
    cipher: AeadCipher<R>,
}

impl Default for DoubleRatchet<Hkdf, OsRandom> {
    fn default() -> Self {
        Self::new(CryptoFactory::default())
    }
}

impl<D: Derivation + Clone, R: RandomSource + Clone> DoubleRatchet<D, R> {
    /// Build the protocol over `factory`.
    pub fn new(factory: CryptoFactory<D, R>) -> Self {
        let cipher = factory.cipher();
        Self { factory, cipher }
    }

    /// The factory backing this ratchet.
    pub fn factory(&self) -> &CryptoFactory<D, R> {
        &self.factory
    }

    /// Derive a fresh session from `shared_secret`.
    ///
    /// Both parties calling this with the same secret and opposite roles get
    /// mirrored chains: the initiator's sending chain is the responder's
    /// receiving chain and vice versa.
    pub fn initialize_session(
        &self,
        shared_secret: &Key,
        role: Role,
    ) -> Result<Session, RatchetError> {
        let mut keys = self
            .factory
            .kdf()
            .derive_keys(shared_secret, SESSION_KEY_COUNT, SESSION_INIT_LABEL, KEY_SIZE)?
            .into_iter();

        let (Some(root), Some(chain_a), Some(chain_b)) = (keys.next(), keys.next(), keys.next())
        else {
            unreachable!("derive_keys returns exactly SESSION_KEY_COUNT keys");
        };

        let (sending, receiving) = match role {
            Role::Initiator => (chain_a, chain_b),
            Role::Responder => (chain_b, chain_a),
        };

        let session = Session::new(root, sending, receiving, role, self.factory.random())?;
        tracing::debug!(session_id = session.id(), ?role, "session initialized");

        Ok(session)
    }

    /// Encrypt one message on the session's sending chain.
    ///
    /// Returns `nonce || ciphertext || tag`. The sending chain advances only
    /// on success.
    pub fn encrypt(
        &self,
        session: &mut Session,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, RatchetError> {
        let frame = self.seal(session.sending_mut(), plaintext, associated_data)?;
        tracing::trace!(session_id = session.id(), direction = "sending", "chain advanced");

        Ok(frame)
    }

    /// Decrypt the next message on the session's receiving chain.
    ///
    /// # Errors
    ///
    /// - `InputTooShort`: frame shorter than the nonce
    /// - `AuthenticationFailed`: tampering, wrong associated data, or a
    ///   message delivered out of order. The receiving chain is unchanged.
    pub fn decrypt(
        &self,
        session: &mut Session,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, RatchetError> {
        match self.open(session.receiving_mut(), ciphertext, associated_data) {
            Ok(plaintext) => {
                tracing::trace!(session_id = session.id(), direction = "receiving", "chain advanced");
                Ok(plaintext)
            },
            Err(err) => {
                tracing::warn!(session_id = session.id(), error = %err, "decrypt failed");
                Err(err)
            },
        }
    }

    /// Encrypt on a single sending direction.
    pub fn seal(
        &self,
        sending: &mut SendingChain,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, RatchetError> {
        let chain = self.factory.chain(sending.key().clone(), 0);
        let frame = self.cipher.encrypt(plaintext, chain.message_key()?, associated_data)?;

        sending.set_key(chain.advance()?.into_key());
        Ok(frame)
    }

    /// Decrypt on a single receiving direction.
    pub fn open(
        &self,
        receiving: &mut ReceivingChain,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, RatchetError> {
        let chain = self.factory.chain(receiving.key().clone(), 0);
        let plaintext = self.cipher.decrypt(ciphertext, chain.message_key()?, associated_data)?;

        receiving.set_key(chain.advance()?.into_key());
        Ok(plaintext)
    }
}
