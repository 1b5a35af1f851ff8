//! End-to-end conversations between two sessions.

use std::thread;

use chainlock_core::{DoubleRatchet, RatchetError, Role, Security, Session};
use chainlock_crypto::{
    CHAIN_KEY_LABEL, CryptoError, CryptoFactory, Derivation, Hkdf, KEY_SIZE, Key,
    MESSAGE_KEY_LABEL, NONCE_SIZE, RandomSource,
};

// Degenerate source: every fill writes the same byte
#[derive(Clone)]
struct FixedRandom(u8);

impl RandomSource for FixedRandom {
    fn fill(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        buffer.fill(self.0);
        Ok(())
    }
}

fn pair(security: &Security) -> (Session, Session) {
    let secret = security.generate_random_key(KEY_SIZE).unwrap();
    let alice = security.initialize_session(&secret, Role::Initiator).unwrap();
    let bob = security.initialize_session(&secret, Role::Responder).unwrap();
    (alice, bob)
}

#[test]
fn hello_world_ack_scenario() {
    let security: Security = Security::default();
    let (mut alice, mut bob) = pair(&security);

    let c1 = security.encrypt(&mut alice, b"hello", b"").unwrap();
    assert_eq!(security.decrypt(&mut bob, &c1, b"").unwrap(), b"hello");

    let c2 = security.encrypt(&mut alice, b"world", b"").unwrap();
    assert_ne!(c1, c2);
    assert_ne!(&c1[..NONCE_SIZE], &c2[..NONCE_SIZE]);
    assert_eq!(security.decrypt(&mut bob, &c2, b"").unwrap(), b"world");

    let c3 = security.encrypt(&mut bob, b"ack", b"").unwrap();
    assert_eq!(security.decrypt(&mut alice, &c3, b"").unwrap(), b"ack");
}

#[test]
fn same_plaintext_gives_different_frames() {
    let security: Security = Security::default();
    let (mut alice, mut bob) = pair(&security);

    let first = security.encrypt(&mut alice, b"repeat", b"ad").unwrap();
    let second = security.encrypt(&mut alice, b"repeat", b"ad").unwrap();
    assert_ne!(first, second);

    assert_eq!(security.decrypt(&mut bob, &first, b"ad").unwrap(), b"repeat");
    assert_eq!(security.decrypt(&mut bob, &second, b"ad").unwrap(), b"repeat");
}

#[test]
fn message_keys_differ_even_with_repeating_nonces() {
    // Every nonce is identical; only the per-message keys separate the frames
    let factory = CryptoFactory::with_random(Hkdf::default(), FixedRandom(0));
    let security = Security::new(factory);
    let secret = Key::from_bytes([7u8; KEY_SIZE]);
    let mut alice = security.initialize_session(&secret, Role::Initiator).unwrap();
    let mut bob = security.initialize_session(&secret, Role::Responder).unwrap();

    let mut frames = Vec::new();
    for _ in 0..4 {
        frames.push(security.encrypt(&mut alice, b"same", b"").unwrap());
    }
    for i in 0..frames.len() {
        for j in (i + 1)..frames.len() {
            assert_eq!(frames[i][..NONCE_SIZE], frames[j][..NONCE_SIZE]);
            assert_ne!(frames[i][NONCE_SIZE..], frames[j][NONCE_SIZE..]);
        }
    }
    for frame in &frames {
        assert_eq!(security.decrypt(&mut bob, frame, b"").unwrap(), b"same");
    }
}

#[test]
fn long_interleaved_conversation() {
    let security: Security = Security::default();
    let (mut alice, mut bob) = pair(&security);

    for round in 0..50u32 {
        let ad = round.to_be_bytes();
        let outgoing = format!("alice {round}");
        let frame = security.encrypt(&mut alice, outgoing.as_bytes(), &ad).unwrap();
        assert_eq!(security.decrypt(&mut bob, &frame, &ad).unwrap(), outgoing.as_bytes());

        if round % 3 == 0 {
            let reply = format!("bob {round}");
            let frame = security.encrypt(&mut bob, reply.as_bytes(), &ad).unwrap();
            assert_eq!(security.decrypt(&mut alice, &frame, &ad).unwrap(), reply.as_bytes());
        }
    }
}

#[test]
fn burst_then_drain_in_order() {
    let security: Security = Security::default();
    let (mut alice, mut bob) = pair(&security);

    let frames: Vec<_> = (0..10u8)
        .map(|i| security.encrypt(&mut alice, &[i; 3], b"").unwrap())
        .collect();

    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(security.decrypt(&mut bob, frame, b"").unwrap(), vec![i as u8; 3]);
    }
}

#[test]
fn dropped_frame_desynchronizes_direction() {
    let security: Security = Security::default();
    let (mut alice, mut bob) = pair(&security);

    let _lost = security.encrypt(&mut alice, b"lost", b"").unwrap();
    let next = security.encrypt(&mut alice, b"next", b"").unwrap();
    let later = security.encrypt(&mut alice, b"later", b"").unwrap();

    for frame in [&next, &later] {
        assert_eq!(
            security.decrypt(&mut bob, frame, b""),
            Err(RatchetError::Crypto(CryptoError::AuthenticationFailed))
        );
    }

    // The reverse direction is unaffected
    let reply = security.encrypt(&mut bob, b"still here", b"").unwrap();
    assert_eq!(security.decrypt(&mut alice, &reply, b"").unwrap(), b"still here");
}

#[test]
fn reordered_pair_fails_for_at_least_one() {
    let security: Security = Security::default();
    let (mut alice, mut bob) = pair(&security);

    let first = security.encrypt(&mut alice, b"first", b"").unwrap();
    let second = security.encrypt(&mut alice, b"second", b"").unwrap();

    let second_result = security.decrypt(&mut bob, &second, b"");
    let first_result = security.decrypt(&mut bob, &first, b"");

    assert!(second_result.is_err());
    // The chain never moved, so the first frame is still the expected one
    assert_eq!(first_result.unwrap(), b"first");
}

#[test]
fn compromised_chain_key_does_not_open_past_messages() {
    let ratchet: DoubleRatchet = DoubleRatchet::default();
    let secret = Key::from_bytes([0x42; KEY_SIZE]);
    let mut alice = ratchet.initialize_session(&secret, Role::Initiator).unwrap();

    let past: Vec<_> =
        (0..3u8).map(|i| ratchet.encrypt(&mut alice, &[i], b"").unwrap()).collect();

    // Attacker learns the current sending chain key and builds a receiver on it
    let leaked = alice.sending_chain_key().clone();
    let mut attacker = Session::with_id(
        "attacker",
        Key::from_bytes([0u8; KEY_SIZE]),
        Key::from_bytes([0u8; KEY_SIZE]),
        leaked.clone(),
        Role::Responder,
    )
    .unwrap();

    for frame in &past {
        assert!(ratchet.decrypt(&mut attacker, frame, b"").is_err());
    }

    // Keys reachable forward from the leak never coincide with past keys
    let kdf = Hkdf::default();
    let mut past_message_keys = Vec::new();
    let fresh = ratchet.initialize_session(&secret, Role::Initiator).unwrap();
    let mut chain_key = fresh.sending_chain_key().clone();
    for _ in 0..3 {
        past_message_keys.push(kdf.derive_key(&chain_key, MESSAGE_KEY_LABEL, 32).unwrap());
        chain_key = kdf.derive_key(&chain_key, CHAIN_KEY_LABEL, 32).unwrap();
    }
    assert_eq!(chain_key, leaked);

    let mut forward = leaked;
    for _ in 0..16 {
        let message_key = kdf.derive_key(&forward, MESSAGE_KEY_LABEL, 32).unwrap();
        assert!(past_message_keys.iter().all(|past| past != &message_key));
        forward = kdf.derive_key(&forward, CHAIN_KEY_LABEL, 32).unwrap();
    }
}

#[test]
fn directions_run_in_parallel() {
    let ratchet: DoubleRatchet = DoubleRatchet::default();
    let secret = Key::from_bytes([0x24; KEY_SIZE]);
    let mut alice = ratchet.initialize_session(&secret, Role::Initiator).unwrap();
    let mut bob = ratchet.initialize_session(&secret, Role::Responder).unwrap();

    let from_bob: Vec<_> =
        (0..20u8).map(|i| ratchet.encrypt(&mut bob, &[i; 8], b"").unwrap()).collect();

    let (alice_send, alice_recv) = alice.directions_mut();
    let (to_bob, received) = thread::scope(|scope| {
        let sender = scope.spawn(|| {
            (0..20u8).map(|i| ratchet.seal(alice_send, &[i; 4], b"").unwrap()).collect::<Vec<_>>()
        });
        let receiver = scope.spawn(|| {
            from_bob
                .iter()
                .map(|frame| ratchet.open(alice_recv, frame, b"").unwrap())
                .collect::<Vec<_>>()
        });
        (sender.join().unwrap(), receiver.join().unwrap())
    });

    for (i, plaintext) in received.iter().enumerate() {
        assert_eq!(plaintext, &vec![i as u8; 8]);
    }
    for (i, frame) in to_bob.iter().enumerate() {
        assert_eq!(ratchet.decrypt(&mut bob, frame, b"").unwrap(), vec![i as u8; 4]);
    }
}

#[test]
fn independent_sessions_do_not_share_state() {
    let security: Security = Security::default();
    let (mut alice1, mut bob1) = pair(&security);
    let (mut alice2, mut bob2) = pair(&security);

    let frame1 = security.encrypt(&mut alice1, b"one", b"").unwrap();
    let frame2 = security.encrypt(&mut alice2, b"two", b"").unwrap();

    assert!(security.decrypt(&mut bob2, &frame1, b"").is_err());
    assert_eq!(security.decrypt(&mut bob1, &frame1, b"").unwrap(), b"one");
    assert_eq!(security.decrypt(&mut bob2, &frame2, b"").unwrap(), b"two");
}
