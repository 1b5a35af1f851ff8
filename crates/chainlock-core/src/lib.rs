//! Chainlock session protocol.
//!
//! Symmetric-key ratchet sessions between two parties, built on
//! [`chainlock_crypto`]. A shared secret (from an external key agreement)
//! seeds a [`Session`]; every message then uses a one-time key pulled from
//! the sender's chain, after which the chain moves forward and the old chain
//! key is gone.
//!
//! # Components
//!
//! - [`Session`]: per-conversation state (root key, sending and receiving
//!   chain heads, role, id)
//! - [`DoubleRatchet`]: session initialization and per-message
//!   encrypt/decrypt
//! - [`Security`]: facade over the factory and the ratchet
//!
//! # Ordering
//!
//! Frames of one direction must reach `decrypt` in the order `encrypt`
//! produced them. A skipped, duplicated or reordered frame fails
//! authentication, and a dropped frame desynchronizes the direction until
//! the session is re-initialized.
//!
//! # Concurrency
//!
//! Everything here is synchronous and CPU bound. Sessions are mutated
//! through `&mut`, which serializes writers per session;
//! [`Session::directions_mut`] lets the two directions proceed in parallel.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod ratchet;
pub mod security;
pub mod session;

pub use chainlock_crypto::{CryptoError, Key};
pub use error::RatchetError;
pub use ratchet::{DoubleRatchet, SESSION_INIT_LABEL};
pub use security::Security;
pub use session::{ReceivingChain, Role, SESSION_ID_BYTES, SendingChain, Session};
