//! `fieldseal encrypt`: seal a value into an envelope.

use std::sync::Arc;

use crate::cli::output;
use crate::cli::{open_registry, read_input, resolve_key_name, Cli};
use crate::errors::Result;
use crate::service::EnvelopeCipher;

/// Execute the `encrypt` command.
pub fn execute(cli: &Cli, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let key_name = resolve_key_name(key)?;
    let (_path, registry) = open_registry(cli)?;
    let cipher = EnvelopeCipher::new(Arc::new(registry));

    if value.is_some() {
        output::warning("Value provided on command line — it may appear in shell history.");
    }
    let plaintext = read_input(value, "Value to encrypt", true)?;

    // The envelope alone goes to stdout so it can be piped.
    let envelope = cipher.encrypt(&plaintext, &key_name)?;
    println!("{envelope}");

    Ok(())
}
