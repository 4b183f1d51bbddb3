//! `fieldseal keygen`: create (or replace) a named data key.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_registry, validate_key_name, Cli};
use crate::errors::{FieldSealError, Result};
use crate::registry::{save_registry, KeyRegistry};

/// Execute the `keygen` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    validate_key_name(name)?;
    let (path, registry) = open_registry(cli)?;

    // Replacing a key orphans every envelope sealed under it.
    if registry.contains(name) && !force {
        if !io::stdin().is_terminal() {
            return Err(FieldSealError::CommandFailed(format!(
                "key '{name}' already exists — pass --force to replace it"
            )));
        }

        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace key '{name}'? Values encrypted under it can no longer be decrypted"
            ))
            .default(false)
            .interact()
            .map_err(|e| FieldSealError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    registry.create(name);
    save_registry(&path, &registry)?;

    let dek = registry.lookup(name)?;
    output::success(&format!(
        "Created key '{name}' (fingerprint {}) in {}",
        dek.fingerprint(),
        path.display()
    ));
    output::tip(&format!("Encrypt a value: fieldseal encrypt --key {name} <VALUE>"));

    Ok(())
}
