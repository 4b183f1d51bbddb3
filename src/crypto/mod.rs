//! Cryptographic primitives for FieldSeal.
//!
//! This module provides:
//! - Injectable random sources for keys and IVs (`random`)
//! - PKCS#7 padding to the AES block size (`padding`)
//! - Unpadded AES-256-CBC block mode (`cbc`)

pub mod cbc;
pub mod padding;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{OsEntropy, EntropySource, pad, unpad, ...};
pub use cbc::{decrypt_in_place, encrypt_in_place, IV_LEN, KEY_LEN};
pub use padding::{pad, unpad, BLOCK_LEN};
pub use random::{EntropySource, OsEntropy, SeededEntropy};
