//! `fieldseal keys`: list registered data keys.

use crate::cli::output;
use crate::cli::{open_registry, Cli};
use crate::errors::Result;

/// Execute the `keys` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_path, registry) = open_registry(cli)?;
    output::print_keys_table(&registry.key_infos());
    Ok(())
}
