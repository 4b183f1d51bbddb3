//! `fieldseal inspect`: describe an envelope without decrypting it.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::cli::output;
use crate::cli::read_input;
use crate::crypto::{BLOCK_LEN, IV_LEN};
use crate::envelope::Envelope;
use crate::errors::Result;

/// Execute the `inspect` command.
pub fn execute(envelope: Option<&str>) -> Result<()> {
    let text = read_input(envelope, "Envelope", false)?;
    let envelope = Envelope::decode(text.trim())?;

    let ciphertext_len = envelope.ciphertext().len();
    // Padding always adds at least one byte.
    let max_plaintext = ciphertext_len.saturating_sub(1);

    output::print_table(
        &["Field", "Value"],
        vec![
            vec!["Version".into(), format!("{:?}", envelope.version())],
            vec!["IV".into(), BASE64.encode(envelope.iv())],
            vec!["IV bytes".into(), IV_LEN.to_string()],
            vec!["Ciphertext bytes".into(), ciphertext_len.to_string()],
            vec![
                "Blocks".into(),
                format!("{} x {BLOCK_LEN}", envelope.block_count()),
            ],
            vec![
                "Plaintext bytes".into(),
                if ciphertext_len == 0 {
                    "none (no ciphertext)".into()
                } else {
                    format!("{}..={max_plaintext}", ciphertext_len - BLOCK_LEN)
                },
            ],
        ],
    );

    Ok(())
}
