//! `fieldseal demo`: encrypt and decrypt a few sample user records.
//!
//! Runs against a throwaway in-memory registry; the keyfile is never
//! touched.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::cli::output;
use crate::crypto::IV_LEN;
use crate::errors::{FieldSealError, Result};
use crate::registry::{InMemoryKeyRegistry, KeyRegistry};
use crate::service::{EnvelopeCipher, ALGORITHM};

const SSN_KEY: &str = "users_ssn_key";
const CARD_KEY: &str = "users_cc_key";

/// Width at which envelopes are shortened in tables.
const PREVIEW_WIDTH: usize = 40;

/// (username, email, national id, card number)
const SAMPLE_USERS: [(&str, &str, &str, &str); 3] = [
    ("john_doe", "john@example.com", "123-45-6789", "1234-5678-9012-3456"),
    ("jane_smith", "jane@example.com", "987-65-4321", "9876-5432-1098-7654"),
    ("bob_wilson", "bob@example.com", "555-12-3456", "5555-6666-7777-8888"),
];

struct StoredUser {
    username: &'static str,
    email: &'static str,
    ssn: String,
    card: String,
}

/// Execute the `demo` command.
pub fn execute() -> Result<()> {
    output::section("Step 1: Create data keys");
    let registry = Arc::new(InMemoryKeyRegistry::new());
    for name in [SSN_KEY, CARD_KEY] {
        registry.create(name);
        let fingerprint = registry.lookup(name)?.fingerprint();
        output::success(&format!("Created '{name}' (fingerprint {fingerprint})"));
    }
    let cipher = EnvelopeCipher::new(Arc::clone(&registry));

    output::section("Step 2: Store users with encrypted fields");
    let mut users = Vec::with_capacity(SAMPLE_USERS.len());
    for (username, email, ssn, card) in SAMPLE_USERS {
        users.push(StoredUser {
            username,
            email,
            ssn: cipher.encrypt(ssn, SSN_KEY)?,
            card: cipher.encrypt(card, CARD_KEY)?,
        });
        output::success(&format!("Stored {username}"));
    }

    output::section("Step 3: What an unprivileged reader sees");
    output::print_table(
        &["Username", "Email", "SSN (encrypted)", "Card (encrypted)"],
        users
            .iter()
            .map(|u| {
                vec![
                    u.username.to_string(),
                    u.email.to_string(),
                    output::preview(&u.ssn, PREVIEW_WIDTH),
                    output::preview(&u.card, PREVIEW_WIDTH),
                ]
            })
            .collect(),
    );

    output::section("Step 4: What a key holder sees");
    let mut rows = Vec::with_capacity(users.len());
    for u in &users {
        rows.push(vec![
            u.username.to_string(),
            cipher.decrypt(&u.ssn, SSN_KEY)?,
            cipher.decrypt(&u.card, CARD_KEY)?,
        ]);
    }
    output::print_table(&["Username", "SSN", "Card"], rows);

    output::section("Step 5: Envelope anatomy");
    let (_, _, sample_ssn, _) = SAMPLE_USERS[0];
    let sample = &users[0].ssn;
    let decoded_len = BASE64
        .decode(sample)
        .map_err(|e| FieldSealError::MalformedEnvelope(e.to_string()))?
        .len();
    output::print_table(
        &["Property", "Value"],
        vec![
            vec!["Algorithm".into(), ALGORITHM.into()],
            vec!["Plaintext".into(), format!("'{sample_ssn}' ({} bytes)", sample_ssn.len())],
            vec!["Envelope (base64)".into(), format!("{} chars", sample.len())],
            vec!["Envelope (bytes)".into(), decoded_len.to_string()],
            vec![
                "Layout".into(),
                format!("{IV_LEN}-byte IV + {}-byte ciphertext", decoded_len - IV_LEN),
            ],
        ],
    );

    output::section("Step 6: Same plaintext, different envelopes");
    let samples = (0..3)
        .map(|_| cipher.encrypt(sample_ssn, SSN_KEY))
        .collect::<Result<Vec<_>>>()?;
    for (i, envelope) in samples.iter().enumerate() {
        output::info(&format!("Envelope {}: {}", i + 1, output::preview(envelope, 50)));
    }
    let all_distinct = samples[0] != samples[1] && samples[1] != samples[2] && samples[0] != samples[2];
    if all_distinct {
        output::success("Every envelope differs (fresh random IV per call)");
    } else {
        output::warning("Duplicate envelopes observed — the IV source is not random");
    }

    output::section("Done");
    output::tip("Keys above were ephemeral. Use `fieldseal keygen` for persistent keys.");

    Ok(())
}
