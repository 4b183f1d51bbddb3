//! Envelope framing and transport encoding.
//!
//! An envelope is one encrypted value, self-describing except for the
//! key name:
//!
//! ```text
//! base64( IV: 16 bytes | CIPHERTEXT: N bytes, N a multiple of 16 )
//! ```
//!
//! Standard alphabet, padded, no line wrapping. The current layout is
//! untagged and is treated as version 0; `EnvelopeVersion::detect` is the
//! single place a future tagged layout would be recognised.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::crypto::{BLOCK_LEN, IV_LEN};
use crate::errors::{FieldSealError, Result};

/// Envelope layout versions understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeVersion {
    /// Untagged `IV || CIPHERTEXT`.
    V0,
}

impl EnvelopeVersion {
    /// Work out which layout `bytes` use.
    ///
    /// V0 carries no tag byte, so every input is read as V0.
    pub fn detect(_bytes: &[u8]) -> Self {
        EnvelopeVersion::V0
    }
}

/// A decoded envelope: the IV and the block-aligned ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Build an envelope from its parts.
    ///
    /// `ciphertext` must be block-aligned.
    pub fn new(iv: [u8; IV_LEN], ciphertext: Vec<u8>) -> Result<Self> {
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(FieldSealError::MalformedEnvelope(format!(
                "ciphertext length {} is not a multiple of {BLOCK_LEN}",
                ciphertext.len()
            )));
        }
        Ok(Self { iv, ciphertext })
    }

    pub fn version(&self) -> EnvelopeVersion {
        EnvelopeVersion::V0
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Number of ciphertext blocks.
    pub fn block_count(&self) -> usize {
        self.ciphertext.len() / BLOCK_LEN
    }

    pub(crate) fn into_parts(self) -> ([u8; IV_LEN], Vec<u8>) {
        (self.iv, self.ciphertext)
    }

    /// Raw `IV || CIPHERTEXT` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(IV_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Transport form: standard padded base64 of [`Envelope::to_bytes`].
    pub fn encode(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Parse the transport form.
    ///
    /// Fails with `MalformedEnvelope` if `text` is not valid base64 or the
    /// decoded bytes are not `16 + 16k` long.
    pub fn decode(text: &str) -> Result<Self> {
        let bytes = BASE64
            .decode(text)
            .map_err(|e| FieldSealError::MalformedEnvelope(format!("invalid base64: {e}")))?;

        match EnvelopeVersion::detect(&bytes) {
            EnvelopeVersion::V0 => Self::from_v0_bytes(bytes),
        }
    }

    fn from_v0_bytes(mut bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < IV_LEN {
            return Err(FieldSealError::MalformedEnvelope(format!(
                "decoded length {} is shorter than the {IV_LEN}-byte IV",
                bytes.len()
            )));
        }

        let ciphertext = bytes.split_off(IV_LEN);
        let iv: [u8; IV_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| FieldSealError::MalformedEnvelope("bad IV length".into()))?;

        Self::new(iv, ciphertext)
    }
}
