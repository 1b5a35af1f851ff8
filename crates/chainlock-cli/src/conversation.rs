//! Scripted two-party conversation.

use chainlock_core::{RatchetError, Role, Security, Session};
use chainlock_crypto::{KEY_SIZE, NONCE_SIZE};
use thiserror::Error;

/// Errors from running a conversation
#[derive(Debug, Error)]
pub enum ConversationError {
    /// A session operation failed
    #[error(transparent)]
    Ratchet(#[from] RatchetError),

    /// The receiver decrypted something other than what was sent
    #[error("message {index} decrypted to different bytes")]
    Mismatch {
        /// Position of the message in the conversation
        index: usize,
    },
}

/// Parameters of a run.
#[derive(Debug, Clone, Default)]
pub struct ConversationConfig {
    /// Number of messages, alternating Alice and Bob
    pub messages: usize,
    /// Associated data bound to every frame
    pub associated_data: Vec<u8>,
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Messages encrypted and decrypted successfully
    pub delivered: usize,
    /// Total frame bytes produced
    pub bytes_on_wire: usize,
}

/// Two sessions seeded from one secret.
pub struct Conversation {
    alice: Session,
    bob: Session,
}

impl Conversation {
    /// Seed both sides from a fresh random secret.
    pub fn start(security: &Security) -> Result<Self, ConversationError> {
        // Stand-in for a key agreement output
        let agreed = security.generate_random_key(KEY_SIZE)?;
        let secret = security.create_shared_key(agreed.as_bytes())?;

        let alice = security.initialize_session(&secret, Role::Initiator)?;
        let bob = security.initialize_session(&secret, Role::Responder)?;
        tracing::debug!(alice = alice.id(), bob = bob.id(), "sessions ready");

        Ok(Self { alice, bob })
    }

    /// Exchange `config.messages` messages, Alice on even turns.
    pub fn run(
        &mut self,
        security: &Security,
        config: &ConversationConfig,
    ) -> Result<Summary, ConversationError> {
        let mut summary = Summary { delivered: 0, bytes_on_wire: 0 };

        for index in 0..config.messages {
            let (name, sender, receiver) = if index % 2 == 0 {
                ("alice", &mut self.alice, &mut self.bob)
            } else {
                ("bob", &mut self.bob, &mut self.alice)
            };

            let plaintext = format!("message {index} from {name}");
            let frame = security.encrypt(sender, plaintext.as_bytes(), &config.associated_data)?;
            tracing::debug!(
                index,
                from = name,
                nonce = %hex::encode(&frame[..NONCE_SIZE]),
                len = frame.len(),
                "frame sealed"
            );

            let decrypted = security.decrypt(receiver, &frame, &config.associated_data)?;
            if decrypted != plaintext.as_bytes() {
                return Err(ConversationError::Mismatch { index });
            }
            tracing::info!(index, from = name, text = %plaintext, "delivered");

            summary.delivered += 1;
            summary.bytes_on_wire += frame.len();
        }

        Ok(summary)
    }
}
