//! `fieldseal decrypt`: open an envelope and print its value.

use std::sync::Arc;

use crate::cli::{open_registry, read_input, resolve_key_name, Cli};
use crate::errors::Result;
use crate::service::EnvelopeCipher;

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, key: Option<&str>, envelope: Option<&str>) -> Result<()> {
    let key_name = resolve_key_name(key)?;
    let (_path, registry) = open_registry(cli)?;
    let cipher = EnvelopeCipher::new(Arc::new(registry));

    let envelope = read_input(envelope, "Envelope", false)?;
    let plaintext = cipher.decrypt(envelope.trim(), &key_name)?;
    println!("{plaintext}");

    Ok(())
}
