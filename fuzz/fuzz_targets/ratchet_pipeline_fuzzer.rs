//! Fuzz target for the session ratchet
//!
//! Drives two mirrored sessions through arbitrary operation sequences.
//!
//! # Strategy
//!
//! - Arbitrary shared secrets (empty, small, large)
//! - Interleaved sends in both directions
//! - Tampered frames, wrong associated data, dropped frames
//!
//! # Invariants
//!
//! - In-order, untouched frames always decrypt to the sent plaintext
//! - Tampered frames or associated data never decrypt
//! - A failed decrypt leaves the receiving chain unchanged
//! - After a dropped frame the direction stays desynchronized

#![no_main]

use arbitrary::Arbitrary;
use chainlock_core::{DoubleRatchet, Role, Session};
use chainlock_crypto::Key;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Scenario {
    secret: Vec<u8>,
    operations: Vec<Operation>,
}

#[derive(Debug, Arbitrary)]
enum Operation {
    /// Send and deliver intact
    Deliver { from_alice: bool, message: Vec<u8>, associated_data: Vec<u8> },
    /// Send, flip one byte, deliver
    Tamper { from_alice: bool, message: Vec<u8>, position: u16, flip: u8 },
    /// Send but deliver with different associated data
    WrongAssociatedData { from_alice: bool, message: Vec<u8> },
    /// Send and never deliver
    Drop { from_alice: bool },
}

fuzz_target!(|scenario: Scenario| {
    let ratchet: DoubleRatchet = DoubleRatchet::default();
    let secret = Key::from_bytes(scenario.secret);
    let (Ok(mut alice), Ok(mut bob)) = (
        ratchet.initialize_session(&secret, Role::Initiator),
        ratchet.initialize_session(&secret, Role::Responder),
    ) else {
        return;
    };

    // Once a frame is dropped that direction can never recover
    let mut desynced = [false, false];

    for operation in scenario.operations.into_iter().take(64) {
        match operation {
            Operation::Deliver { from_alice, message, associated_data } => {
                let lane = usize::from(!from_alice);
                let (sender, receiver) = sides(&mut alice, &mut bob, from_alice);

                let frame = ratchet.encrypt(sender, &message, &associated_data).unwrap();
                let result = ratchet.decrypt(receiver, &frame, &associated_data);

                if desynced[lane] {
                    assert!(result.is_err(), "desynchronized direction decrypted");
                } else {
                    assert_eq!(result.unwrap(), message);
                }
            },
            Operation::Tamper { from_alice, message, position, flip } => {
                if flip == 0 {
                    continue;
                }
                let (sender, receiver) = sides(&mut alice, &mut bob, from_alice);

                let mut frame = ratchet.encrypt(sender, &message, b"").unwrap();
                let at = usize::from(position) % frame.len();
                frame[at] ^= flip;

                let before = receiver.receiving_chain_key().clone();
                assert!(ratchet.decrypt(receiver, &frame, b"").is_err());
                assert_eq!(receiver.receiving_chain_key(), &before);

                // The untampered frame was consumed from the sender's chain
                desynced[usize::from(!from_alice)] = true;
            },
            Operation::WrongAssociatedData { from_alice, message } => {
                let (sender, receiver) = sides(&mut alice, &mut bob, from_alice);

                let frame = ratchet.encrypt(sender, &message, b"right").unwrap();
                let before = receiver.receiving_chain_key().clone();
                assert!(ratchet.decrypt(receiver, &frame, b"wrong").is_err());
                assert_eq!(receiver.receiving_chain_key(), &before);

                let lane = usize::from(!from_alice);
                let retry = ratchet.decrypt(receiver, &frame, b"right");
                if desynced[lane] {
                    assert!(retry.is_err());
                } else {
                    assert_eq!(retry.unwrap(), message);
                }
            },
            Operation::Drop { from_alice } => {
                let (sender, _) = sides(&mut alice, &mut bob, from_alice);
                let _ = ratchet.encrypt(sender, b"lost", b"").unwrap();
                desynced[usize::from(!from_alice)] = true;
            },
        }
    }
});

fn sides<'a>(
    alice: &'a mut Session,
    bob: &'a mut Session,
    from_alice: bool,
) -> (&'a mut Session, &'a mut Session) {
    if from_alice { (alice, bob) } else { (bob, alice) }
}
