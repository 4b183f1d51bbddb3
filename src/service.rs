//! Envelope cipher service: AES-256-CBC envelope encryption under
//! named data keys.
//!
//! `encrypt` resolves the key, draws a fresh random IV, applies PKCS#7
//! padding, runs AES-256-CBC and returns `base64(IV || CIPHERTEXT)`.
//! `decrypt` walks the same steps backwards.
//!
//! The scheme gives confidentiality only. There is no authentication
//! tag, so `InvalidPadding` cannot tell a wrong key apart from tampered
//! ciphertext and must not be used as a tamper check.

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::crypto::{self, EntropySource, OsEntropy, IV_LEN};
use crate::envelope::Envelope;
use crate::errors::{FieldSealError, Result};
use crate::registry::KeyRegistry;

/// Algorithm identifier reported to callers (not embedded in envelopes).
pub const ALGORITHM: &str = "aes-256-cbc";

/// Seals and opens envelopes using keys from a `KeyRegistry`.
///
/// Holds no mutable state of its own. Concurrent calls are independent,
/// even under the same key name.
pub struct EnvelopeCipher<R: KeyRegistry + ?Sized, E: EntropySource = OsEntropy> {
    registry: Arc<R>,
    entropy: E,
}

impl<R: KeyRegistry + ?Sized> EnvelopeCipher<R, OsEntropy> {
    /// Create a cipher that draws IVs from the OS-seeded CSPRNG.
    pub fn new(registry: Arc<R>) -> Self {
        Self::with_entropy(registry, OsEntropy)
    }
}

impl<R: KeyRegistry + ?Sized, E: EntropySource> EnvelopeCipher<R, E> {
    /// Create a cipher with an explicit IV source.
    pub fn with_entropy(registry: Arc<R>, entropy: E) -> Self {
        Self { registry, entropy }
    }

    /// The registry keys are resolved from.
    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Encrypt `plaintext` under the key named `key_name`.
    ///
    /// Fails only with `KeyNotFound`; every call uses a new random IV, so
    /// sealing the same value twice yields different envelopes.
    pub fn encrypt(&self, plaintext: &str, key_name: &str) -> Result<String> {
        let dek = self.registry.lookup(key_name)?;

        let mut iv = [0u8; IV_LEN];
        self.entropy.fill(&mut iv);

        let mut buf = crypto::pad(plaintext.as_bytes());
        crypto::encrypt_in_place(dek.as_bytes(), &iv, &mut buf)?;

        let envelope = Envelope::new(iv, buf.to_vec())?;
        log::trace!(
            "sealed {} byte(s) under '{key_name}' into {} block(s)",
            plaintext.len(),
            envelope.block_count()
        );

        Ok(envelope.encode())
    }

    /// Decrypt an envelope produced by [`EnvelopeCipher::encrypt`].
    ///
    /// Errors, in the order they are checked: `KeyNotFound`,
    /// `MalformedEnvelope`, `InvalidPadding`, `InvalidEncoding`.
    pub fn decrypt(&self, envelope: &str, key_name: &str) -> Result<String> {
        let dek = self.registry.lookup(key_name)?;

        let (iv, ciphertext) = Envelope::decode(envelope)?.into_parts();
        let mut buf = Zeroizing::new(ciphertext);

        crypto::decrypt_in_place(dek.as_bytes(), &iv, &mut buf)?;

        let message = crypto::unpad(&buf).map_err(|e| {
            log::debug!("padding check failed for envelope under '{key_name}'");
            e
        })?;

        let plaintext = std::str::from_utf8(message)
            .map_err(|_| FieldSealError::InvalidEncoding)?
            .to_string();

        log::trace!("opened {} byte(s) under '{key_name}'", plaintext.len());
        Ok(plaintext)
    }
}
