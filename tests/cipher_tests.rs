//! Integration tests for the envelope cipher service.

use std::sync::Arc;
use std::thread;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use fieldseal::crypto::SeededEntropy;
use fieldseal::{EnvelopeCipher, FieldSealError, InMemoryKeyRegistry, KeyRegistry};

/// Helper: a cipher over a fresh registry with the given keys created.
fn cipher_with(keys: &[&str]) -> EnvelopeCipher<InMemoryKeyRegistry> {
    let registry = Arc::new(InMemoryKeyRegistry::new());
    for k in keys {
        registry.create(k);
    }
    EnvelopeCipher::new(registry)
}

fn decoded_len(envelope: &str) -> usize {
    BASE64.decode(envelope).expect("envelope is base64").len()
}

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn national_id_scenario() {
    let cipher = cipher_with(&["k1"]);

    let envelope = cipher.encrypt("123-45-6789", "k1").expect("encrypt");
    // 16-byte IV + one padded block.
    assert_eq!(decoded_len(&envelope), 32);

    let recovered = cipher.decrypt(&envelope, "k1").expect("decrypt");
    assert_eq!(recovered, "123-45-6789");
}

#[test]
fn roundtrip_various_plaintexts() {
    let cipher = cipher_with(&["users_cc_key"]);
    let long = "x".repeat(10_000);
    let samples = [
        "",
        "a",
        "1234-5678-9012-3456",
        "exactly16bytes!!",
        "주민등록번호 900101-1234567",
        "emoji \u{1F512} and tabs\tand\nnewlines",
        long.as_str(),
    ];

    for plaintext in samples {
        let envelope = cipher.encrypt(plaintext, "users_cc_key").expect("encrypt");
        let recovered = cipher.decrypt(&envelope, "users_cc_key").expect("decrypt");
        assert_eq!(recovered, plaintext);
    }
}

// ---------------------------------------------------------------------------
// Envelope shape and non-determinism
// ---------------------------------------------------------------------------

#[test]
fn envelope_length_is_iv_plus_whole_blocks() {
    let cipher = cipher_with(&["k"]);
    for len in 0..=48 {
        let plaintext = "p".repeat(len);
        let n = decoded_len(&cipher.encrypt(&plaintext, "k").unwrap());
        assert!(n >= 32, "at least IV + one block");
        assert_eq!(n % 16, 0);
        assert_eq!(n, 16 + (len / 16 + 1) * 16);
    }
}

#[test]
fn same_plaintext_gives_different_envelopes() {
    let cipher = cipher_with(&["k"]);

    let e1 = cipher.encrypt("123-45-6789", "k").unwrap();
    let e2 = cipher.encrypt("123-45-6789", "k").unwrap();
    let e3 = cipher.encrypt("123-45-6789", "k").unwrap();

    assert_ne!(e1, e2);
    assert_ne!(e2, e3);
    assert_ne!(e1, e3);
    assert_eq!(e1.len(), e2.len(), "length may still match");
}

#[test]
fn seeded_sources_give_reproducible_envelopes() {
    let fixture = || {
        let registry = Arc::new(InMemoryKeyRegistry::with_entropy(SeededEntropy::new(2024)));
        registry.create("users_ssn_key");
        EnvelopeCipher::with_entropy(registry, SeededEntropy::new(4048))
    };

    let a = fixture().encrypt("987-65-4321", "users_ssn_key").unwrap();
    let b = fixture().encrypt("987-65-4321", "users_ssn_key").unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn unknown_key_fails_both_directions() {
    let cipher = cipher_with(&["k1"]);
    let envelope = cipher.encrypt("v", "k1").unwrap();

    assert!(matches!(
        cipher.encrypt("v", "nonexistent"),
        Err(FieldSealError::KeyNotFound(_))
    ));
    assert!(matches!(
        cipher.decrypt(&envelope, "nonexistent"),
        Err(FieldSealError::KeyNotFound(_))
    ));
}

#[test]
fn wrong_key_never_returns_plaintext() {
    let cipher = cipher_with(&["k1", "k2"]);

    for i in 0..200 {
        let plaintext = format!("555-12-{i:04}");
        let envelope = cipher.encrypt(&plaintext, "k1").unwrap();
        match cipher.decrypt(&envelope, "k2") {
            Err(FieldSealError::InvalidPadding) | Err(FieldSealError::InvalidEncoding) => {}
            // A random final byte of 0x01 passes the padding check about
            // once in 256 tries; the recovered text is still not ours.
            Ok(recovered) => assert_ne!(recovered, plaintext),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn malformed_envelopes_are_rejected() {
    let cipher = cipher_with(&["k"]);

    for bad in [
        "not-base64!!".to_string(),
        BASE64.encode(b"short"),
        BASE64.encode([0u8; 16 + 7]),
        BASE64.encode([0u8; 15]),
    ] {
        assert!(
            matches!(cipher.decrypt(&bad, "k"), Err(FieldSealError::MalformedEnvelope(_))),
            "expected MalformedEnvelope for {bad:?}"
        );
    }
}

#[test]
fn truncated_envelope_is_rejected() {
    let cipher = cipher_with(&["k"]);
    let envelope = cipher.encrypt("a value long enough for two blocks", "k").unwrap();

    let mut raw = BASE64.decode(&envelope).unwrap();
    raw.truncate(raw.len() - 5);
    let err = cipher.decrypt(&BASE64.encode(&raw), "k").unwrap_err();
    assert!(matches!(err, FieldSealError::MalformedEnvelope(_)));
}

#[test]
fn recreated_key_orphans_old_envelopes() {
    let registry = Arc::new(InMemoryKeyRegistry::new());
    registry.create("k");
    let cipher = EnvelopeCipher::new(Arc::clone(&registry));

    let envelope = cipher.encrypt("sealed under the first key", "k").unwrap();
    registry.create("k");

    let reopened = cipher.decrypt(&envelope, "k").ok();
    assert_ne!(reopened.as_deref(), Some("sealed under the first key"));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_calls_share_one_cipher() {
    let cipher = Arc::new(cipher_with(&["users_ssn_key", "users_cc_key"]));

    thread::scope(|s| {
        for t in 0..8 {
            let cipher = Arc::clone(&cipher);
            s.spawn(move || {
                let key = if t % 2 == 0 { "users_ssn_key" } else { "users_cc_key" };
                for i in 0..100 {
                    let plaintext = format!("thread-{t}-value-{i}");
                    let envelope = cipher.encrypt(&plaintext, key).unwrap();
                    assert_eq!(cipher.decrypt(&envelope, key).unwrap(), plaintext);
                }
            });
        }
    });
}

#[test]
fn works_through_trait_object_registry() {
    let registry: Arc<dyn KeyRegistry> = Arc::new(InMemoryKeyRegistry::new());
    registry.create("k");

    let cipher = EnvelopeCipher::new(registry);
    let envelope = cipher.encrypt("dyn", "k").unwrap();
    assert_eq!(cipher.decrypt(&envelope, "k").unwrap(), "dyn");
}
