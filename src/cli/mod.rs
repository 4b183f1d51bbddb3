//! Command-line interface: argument parsing, shared helpers, and the commands.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::OsEntropy;
use crate::errors::{FieldSealError, Result};
use crate::registry::{load_registry, InMemoryKeyRegistry};

/// Maximum key name length accepted on the command line.
const MAX_KEY_NAME_LEN: usize = 128;

/// FieldSeal CLI: envelope encryption for sensitive field-level data.
#[derive(Parser)]
#[command(
    name = "fieldseal",
    about = "Envelope encryption for sensitive field-level data",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the key registry file (default: .fieldseal/keys.json)
    #[arg(long, env = "FIELDSEAL_KEYFILE", global = true)]
    pub keyfile: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate a new data key under a name
    Keygen {
        /// Key name (e.g. users_ssn_key)
        name: String,
        /// Replace an existing key without asking
        #[arg(short, long)]
        force: bool,
    },

    /// List registered data keys
    Keys,

    /// Encrypt a value into an envelope
    Encrypt {
        /// Key name (default: `default_key` from .fieldseal.toml)
        #[arg(short, long)]
        key: Option<String>,
        /// Value to encrypt (omit to read stdin or prompt; one trailing
        /// newline is dropped from piped stdin)
        value: Option<String>,
    },

    /// Decrypt an envelope back into its value
    Decrypt {
        /// Key name (default: `default_key` from .fieldseal.toml)
        #[arg(short, long)]
        key: Option<String>,
        /// Envelope to decrypt (omit to read stdin or prompt)
        envelope: Option<String>,
    },

    /// Show the structure of an envelope (no key needed)
    Inspect {
        /// Envelope to inspect (omit to read stdin or prompt)
        envelope: Option<String>,
    },

    /// Run the JSON request handler on an event
    Handle {
        /// Which handler to run
        #[arg(value_enum)]
        action: HandleAction,
        /// Path to the event JSON (reads stdin if omitted)
        #[arg(long)]
        event: Option<String>,
    },

    /// Walk through encrypting and decrypting sample user records
    Demo,

    /// Measure encrypt/decrypt throughput
    Bench {
        /// Iterations per direction (default: from .fieldseal.toml, else 1000)
        #[arg(short, long)]
        iterations: Option<u32>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show version
    Version,
}

/// Handler selector for `fieldseal handle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum HandleAction {
    Encrypt,
    Decrypt,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.fieldseal.toml` from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the registry file path: `--keyfile` / `FIELDSEAL_KEYFILE`
/// first, then the `keyfile` setting.
pub fn keyfile_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.keyfile {
        return Ok(PathBuf::from(path));
    }
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    Ok(settings.keyfile_path(&cwd))
}

/// Load the key registry named by the CLI arguments.
pub fn open_registry(cli: &Cli) -> Result<(PathBuf, InMemoryKeyRegistry)> {
    let path = keyfile_path(cli)?;
    let registry = load_registry(&path, OsEntropy)?;
    Ok((path, registry))
}

/// Pick the key name from `--key` or the `default_key` setting.
pub fn resolve_key_name(key: Option<&str>) -> Result<String> {
    let name = match key {
        Some(k) => k.to_string(),
        None => load_settings()?.default_key.ok_or_else(|| {
            FieldSealError::CommandFailed(
                "no key name given — pass --key or set default_key in .fieldseal.toml".into(),
            )
        })?,
    };
    validate_key_name(&name)?;
    Ok(name)
}

/// Get an input value, trying in order:
/// 1. the inline command-line argument
/// 2. piped stdin (one trailing line ending removed)
/// 3. an interactive prompt (hidden input when `hidden` is set)
///
/// Returns `Zeroizing<String>` so a plaintext value is wiped on drop.
pub fn read_input(inline: Option<&str>, prompt: &str, hidden: bool) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        strip_line_ending(&mut buf);
        return Ok(buf);
    }

    let value = if hidden {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
    } else {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .interact_text()
    }
    .map_err(|e| FieldSealError::CommandFailed(format!("input prompt: {e}")))?;

    Ok(Zeroizing::new(value))
}

/// Remove a single trailing `\n` or `\r\n`, as left by `echo` or a
/// heredoc. Any further newlines are part of the value.
pub fn strip_line_ending(buf: &mut String) {
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
}

/// Validate that a key name is safe to store and type.
///
/// Allowed: ASCII letters, digits, `_`, `-`, `.`. Must not be empty.
/// Max length 128 characters.
pub fn validate_key_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FieldSealError::CommandFailed(
            "key name cannot be empty".into(),
        ));
    }

    if name.len() > MAX_KEY_NAME_LEN {
        return Err(FieldSealError::CommandFailed(format!(
            "key name cannot exceed {MAX_KEY_NAME_LEN} characters"
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(FieldSealError::CommandFailed(format!(
            "key name '{name}' is invalid — only letters, digits, '_', '-' and '.' are allowed"
        )));
    }

    Ok(())
}
