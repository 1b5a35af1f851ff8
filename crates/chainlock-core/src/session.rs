//! Per-conversation ratchet state.
//!
//! A [`Session`] is a plain holder: it stores the root key, the head of the
//! sending chain and the head of the receiving chain. It never derives
//! anything itself; [`crate::DoubleRatchet`] reads a chain head, derives and
//! writes the successor back.
//!
//! # Invariants
//!
//! - Each chain head is the unconsumed frontier of its chain. Replacing a
//!   head drops (and zeroizes) the previous value.
//! - Only one writer per direction at a time. `&mut` access enforces this;
//!   [`Session::directions_mut`] splits the two directions so they can be
//!   driven from different threads.

use chainlock_crypto::{Key, RandomSource};

use crate::error::RatchetError;

/// Random bytes in a generated session id (hex-encoded to 32 characters)
pub const SESSION_ID_BYTES: usize = 16;

/// Which side of the conversation this session belongs to.
///
/// Fixes which of the two chain keys derived at initialization is used for
/// sending and which for receiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Party that started the conversation
    Initiator,
    /// Party that answered
    Responder,
}

impl Role {
    /// The opposite role.
    pub fn peer(self) -> Self {
        match self {
            Self::Initiator => Self::Responder,
            Self::Responder => Self::Initiator,
        }
    }
}

/// Head of the outgoing chain.
#[derive(Debug)]
pub struct SendingChain {
    key: Key,
}

impl SendingChain {
    /// Current chain key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Replace the chain head, dropping the previous key.
    pub fn set_key(&mut self, key: Key) {
        self.key = key;
    }
}

/// Head of the incoming chain.
#[derive(Debug)]
pub struct ReceivingChain {
    key: Key,
}

impl ReceivingChain {
    /// Current chain key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Replace the chain head, dropping the previous key.
    pub fn set_key(&mut self, key: Key) {
        self.key = key;
    }
}

/// State of one encrypted conversation.
#[derive(Debug)]
pub struct Session {
    id: String,
    root_key: Key,
    sending: SendingChain,
    receiving: ReceivingChain,
    role: Role,
}

impl Session {
    /// Create a session with a freshly generated id.
    pub fn new<R: RandomSource + ?Sized>(
        root_key: Key,
        sending_chain_key: Key,
        receiving_chain_key: Key,
        role: Role,
        random: &R,
    ) -> Result<Self, RatchetError> {
        let mut id = [0u8; SESSION_ID_BYTES];
        random.fill(&mut id)?;

        Ok(Self::assemble(hex::encode(id), root_key, sending_chain_key, receiving_chain_key, role))
    }

    /// Restore a session under an externally chosen id.
    ///
    /// # Errors
    ///
    /// - `InvalidSessionId` if `id` is empty
    pub fn with_id(
        id: impl Into<String>,
        root_key: Key,
        sending_chain_key: Key,
        receiving_chain_key: Key,
        role: Role,
    ) -> Result<Self, RatchetError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RatchetError::InvalidSessionId { reason: "id is empty".to_string() });
        }

        Ok(Self::assemble(id, root_key, sending_chain_key, receiving_chain_key, role))
    }

    fn assemble(
        id: String,
        root_key: Key,
        sending_chain_key: Key,
        receiving_chain_key: Key,
        role: Role,
    ) -> Self {
        Self {
            id,
            root_key,
            sending: SendingChain { key: sending_chain_key },
            receiving: ReceivingChain { key: receiving_chain_key },
            role,
        }
    }

    /// Opaque identifier, suitable as a key in an external session store.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Side of the conversation.
    pub fn role(&self) -> Role {
        self.role
    }

    /// True if this side started the conversation.
    pub fn is_initiator(&self) -> bool {
        self.role == Role::Initiator
    }

    /// Root key. Stored only; no ratchet step consumes it yet.
    pub fn root_key(&self) -> &Key {
        &self.root_key
    }

    /// Replace the root key.
    pub fn set_root_key(&mut self, key: Key) {
        self.root_key = key;
    }

    /// Head of the sending chain.
    pub fn sending_chain_key(&self) -> &Key {
        self.sending.key()
    }

    /// Replace the sending chain head.
    pub fn set_sending_chain_key(&mut self, key: Key) {
        self.sending.set_key(key);
    }

    /// Head of the receiving chain.
    pub fn receiving_chain_key(&self) -> &Key {
        self.receiving.key()
    }

    /// Replace the receiving chain head.
    pub fn set_receiving_chain_key(&mut self, key: Key) {
        self.receiving.set_key(key);
    }

    /// Sending direction, exclusively borrowed.
    pub fn sending_mut(&mut self) -> &mut SendingChain {
        &mut self.sending
    }

    /// Receiving direction, exclusively borrowed.
    pub fn receiving_mut(&mut self) -> &mut ReceivingChain {
        &mut self.receiving
    }

    /// Both directions at once, for driving them independently.
    pub fn directions_mut(&mut self) -> (&mut SendingChain, &mut ReceivingChain) {
        (&mut self.sending, &mut self.receiving)
    }
}
