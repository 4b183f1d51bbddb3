//! Key registry: named data encryption keys held in process memory.
//!
//! The cipher service only depends on the narrow `KeyRegistry` trait
//! (`create` + `lookup`), so a remote key-management backend can replace
//! `InMemoryKeyRegistry` without touching the envelope code.

pub mod dek;
pub mod keyfile;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::crypto::{EntropySource, OsEntropy, KEY_LEN};
use crate::errors::{FieldSealError, Result};

pub use dek::Dek;
pub use keyfile::{load_registry, save_registry};

/// Resolves logical key names to key material.
pub trait KeyRegistry: Send + Sync {
    /// Generate a fresh random key under `key_name`, replacing any key
    /// already stored there.
    ///
    /// Replacing a key makes every envelope sealed under the old one
    /// undecryptable; guarding against that is the caller's job.
    fn create(&self, key_name: &str);

    /// Return the key stored under `key_name`.
    fn lookup(&self, key_name: &str) -> Result<Dek>;
}

/// Listing entry for a registered key. Never carries key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub name: String,
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
}

struct KeyEntry {
    dek: Dek,
    created_at: DateTime<Utc>,
}

/// Process-local registry backed by a `RwLock<HashMap>`.
///
/// Lookups share the read lock and run in parallel. Concurrent `create`
/// calls for the same name race and the last writer wins.
pub struct InMemoryKeyRegistry<E: EntropySource = OsEntropy> {
    keys: RwLock<HashMap<String, KeyEntry>>,
    entropy: E,
}

impl InMemoryKeyRegistry<OsEntropy> {
    /// Create an empty registry that draws keys from the OS-seeded CSPRNG.
    pub fn new() -> Self {
        Self::with_entropy(OsEntropy)
    }
}

impl Default for InMemoryKeyRegistry<OsEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntropySource> InMemoryKeyRegistry<E> {
    /// Create an empty registry that draws key bytes from `entropy`.
    pub fn with_entropy(entropy: E) -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
            entropy,
        }
    }

    /// Store an existing key under `key_name`, replacing any prior entry.
    pub fn insert(&self, key_name: &str, dek: Dek, created_at: DateTime<Utc>) {
        self.write().insert(key_name.to_string(), KeyEntry { dek, created_at });
    }

    /// Whether a key is registered under `key_name`.
    pub fn contains(&self, key_name: &str) -> bool {
        self.read().contains_key(key_name)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Metadata for every registered key, sorted by name.
    pub fn key_infos(&self) -> Vec<KeyInfo> {
        let mut infos: Vec<KeyInfo> = self
            .read()
            .iter()
            .map(|(name, entry)| KeyInfo {
                name: name.clone(),
                fingerprint: entry.dek.fingerprint(),
                created_at: entry.created_at,
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Snapshot of every entry, used when persisting the registry.
    pub(crate) fn entries(&self) -> Vec<(String, Dek, DateTime<Utc>)> {
        let mut entries: Vec<_> = self
            .read()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.dek.clone(), entry.created_at))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    // Every map state a panicking writer can leave behind is valid.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, KeyEntry>> {
        self.keys.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, KeyEntry>> {
        self.keys.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: EntropySource> KeyRegistry for InMemoryKeyRegistry<E> {
    fn create(&self, key_name: &str) {
        let mut bytes = [0u8; KEY_LEN];
        self.entropy.fill(&mut bytes);
        let dek = Dek::from_bytes(bytes);
        zeroize::Zeroize::zeroize(&mut bytes);

        log::debug!(
            "created data key '{key_name}' (fingerprint {})",
            dek.fingerprint()
        );

        let entry = KeyEntry {
            dek,
            created_at: Utc::now(),
        };
        if self.write().insert(key_name.to_string(), entry).is_some() {
            log::warn!(
                "replaced data key '{key_name}'; envelopes sealed under the previous key can no longer be opened"
            );
        }
    }

    fn lookup(&self, key_name: &str) -> Result<Dek> {
        self.read()
            .get(key_name)
            .map(|entry| entry.dek.clone())
            .ok_or_else(|| FieldSealError::KeyNotFound(key_name.to_string()))
    }
}
