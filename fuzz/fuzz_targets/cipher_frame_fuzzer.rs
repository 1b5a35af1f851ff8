//! Fuzz target for ciphertext frame parsing
//!
//! Feeds arbitrary bytes to `decrypt` as a wire frame.
//!
//! # Invariants
//!
//! - Decrypt never panics on arbitrary input
//! - Frames shorter than the nonce report `InputTooShort`
//! - Forged frames never authenticate (no plaintext is released)

#![no_main]

use arbitrary::Arbitrary;
use chainlock_crypto::{AeadCipher, Cipher, CryptoError, Key, NONCE_SIZE};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FrameInput {
    key: [u8; 32],
    associated_data: Vec<u8>,
    frame: Vec<u8>,
}

fuzz_target!(|input: FrameInput| {
    let cipher: AeadCipher = AeadCipher::default();
    let key = Key::from_bytes(input.key);

    match cipher.decrypt(&input.frame, &key, &input.associated_data) {
        Err(CryptoError::InputTooShort { actual, minimum }) => {
            assert!(input.frame.len() < NONCE_SIZE);
            assert_eq!(actual, input.frame.len());
            assert_eq!(minimum, NONCE_SIZE);
        },
        Err(CryptoError::AuthenticationFailed) => {
            assert!(input.frame.len() >= NONCE_SIZE);
        },
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("forged frame authenticated"),
    }
});
