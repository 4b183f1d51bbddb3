//! `fieldseal handle`: run the JSON request handler on one event.
//!
//! Usage:
//!   echo '{"plaintext":"123-45-6789","keyName":"users_ssn_key"}' | fieldseal handle encrypt
//!   fieldseal handle decrypt --event request.json

use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

use serde_json::Value;

use crate::cli::{open_registry, Cli, HandleAction};
use crate::errors::{FieldSealError, Result};
use crate::handler::{handle_decrypt, handle_encrypt};
use crate::service::EnvelopeCipher;

/// Execute the `handle` command.
pub fn execute(cli: &Cli, action: HandleAction, event_path: Option<&str>) -> Result<()> {
    let raw = match event_path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let event: Value = serde_json::from_str(&raw)
        .map_err(|e| FieldSealError::InvalidRequest(format!("event is not JSON: {e}")))?;

    let (_path, registry) = open_registry(cli)?;
    let cipher = EnvelopeCipher::new(Arc::new(registry));

    let response = match action {
        HandleAction::Encrypt => handle_encrypt(&cipher, &event),
        HandleAction::Decrypt => handle_decrypt(&cipher, &event),
    };

    let rendered = serde_json::to_string_pretty(&response)
        .map_err(|e| FieldSealError::SerializationError(format!("response: {e}")))?;
    println!("{rendered}");

    if response.is_success() {
        Ok(())
    } else {
        Err(FieldSealError::CommandFailed(format!(
            "handler returned status {}",
            response.status_code
        )))
    }
}
