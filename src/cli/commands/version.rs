//! `fieldseal version`: display version and cipher details.

use console::style;

use crate::errors::Result;
use crate::service::ALGORITHM;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("fieldseal {current}");
    println!(
        "{} {} (envelope v0: IV || ciphertext, base64)",
        style("cipher:").dim(),
        style(ALGORITHM).cyan()
    );
    Ok(())
}
