//! The data encryption key type.

use std::fmt;

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_LEN;

/// Number of SHA-256 bytes shown in a key fingerprint.
const FINGERPRINT_LEN: usize = 8;

/// A 32-byte AES-256 data encryption key.
///
/// The bytes are wiped from memory when the value is dropped, and the
/// `Debug` output never shows them. Only code inside the crate can read
/// the raw key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Dek {
    bytes: [u8; KEY_LEN],
}

impl Dek {
    /// Wrap existing key material (e.g. loaded from a snapshot file).
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Short, non-reversible identifier for this key: the first 8 bytes
    /// of its SHA-256 digest, hex encoded.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes);
        digest[..FINGERPRINT_LEN]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

impl fmt::Debug for Dek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dek")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}
