//! Registry snapshot file.
//!
//! Persists the named data keys of an `InMemoryKeyRegistry` as JSON so
//! the CLI can seal and open envelopes across separate invocations:
//!
//! ```text
//! { "version": 1,
//!   "keys": [ { "name": "users_ssn_key", "dek": "<base64>", "created_at": "..." } ] }
//! ```
//!
//! The file holds raw key material. It is written atomically and, on
//! Unix, with owner-only permissions.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::{Dek, InMemoryKeyRegistry};
use crate::crypto::{EntropySource, KEY_LEN};
use crate::errors::{FieldSealError, Result};

/// Current snapshot format version.
pub const KEYFILE_VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct KeyfileDocument {
    version: u8,
    #[serde(default)]
    keys: Vec<StoredKey>,
}

#[derive(Serialize, Deserialize)]
struct StoredKey {
    name: String,
    dek: Zeroizing<String>,
    created_at: DateTime<Utc>,
}

/// Load a registry snapshot from `path`.
///
/// A missing file yields an empty registry, so the first `keygen`
/// works without any setup.
pub fn load_registry<E: EntropySource>(path: &Path, entropy: E) -> Result<InMemoryKeyRegistry<E>> {
    let registry = InMemoryKeyRegistry::with_entropy(entropy);

    if !path.exists() {
        log::debug!("no keyfile at {}, starting empty", path.display());
        return Ok(registry);
    }

    let contents = Zeroizing::new(
        fs::read_to_string(path)
            .map_err(|e| FieldSealError::KeyfileError(format!("failed to read keyfile: {e}")))?,
    );

    let doc: KeyfileDocument = serde_json::from_str(&contents).map_err(|e| {
        FieldSealError::KeyfileError(format!("failed to parse {}: {e}", path.display()))
    })?;

    if doc.version != KEYFILE_VERSION {
        return Err(FieldSealError::KeyfileError(format!(
            "unsupported keyfile version {}, expected {KEYFILE_VERSION}",
            doc.version
        )));
    }

    let mut seen = HashSet::new();
    for stored in &doc.keys {
        if !seen.insert(stored.name.as_str()) {
            return Err(FieldSealError::KeyfileError(format!(
                "key '{}' appears more than once in {}",
                stored.name,
                path.display()
            )));
        }

        let raw = Zeroizing::new(BASE64.decode(stored.dek.as_bytes()).map_err(|e| {
            FieldSealError::KeyfileError(format!("key '{}' is not valid base64: {e}", stored.name))
        })?);

        let bytes: [u8; KEY_LEN] = raw.as_slice().try_into().map_err(|_| {
            FieldSealError::KeyfileError(format!(
                "key '{}' must be exactly {KEY_LEN} bytes, got {}",
                stored.name,
                raw.len()
            ))
        })?;

        registry.insert(&stored.name, Dek::from_bytes(bytes), stored.created_at);
    }

    log::debug!("loaded {} key(s) from {}", registry.len(), path.display());
    Ok(registry)
}

/// Write every key in `registry` to `path`, replacing the file atomically.
pub fn save_registry<E: EntropySource>(path: &Path, registry: &InMemoryKeyRegistry<E>) -> Result<()> {
    let doc = KeyfileDocument {
        version: KEYFILE_VERSION,
        keys: registry
            .entries()
            .into_iter()
            .map(|(name, dek, created_at)| StoredKey {
                name,
                dek: Zeroizing::new(BASE64.encode(dek.as_bytes())),
                created_at,
            })
            .collect(),
    };

    let json = Zeroizing::new(
        serde_json::to_string_pretty(&doc)
            .map_err(|e| FieldSealError::SerializationError(format!("keyfile: {e}")))?,
    );

    // Ensure the parent directory exists.
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| {
            FieldSealError::KeyfileError(format!("cannot create keyfile directory: {e}"))
        })?;
    }

    // Atomic write: fresh temp file in the same directory, then rename.
    let tmp_path = temp_path_for(parent, path);
    let mut file = create_private_file(&tmp_path).map_err(|e| {
        FieldSealError::KeyfileError(format!(
            "failed to create {}: {e}",
            tmp_path.display()
        ))
    })?;
    let written = file.write_all(json.as_bytes()).and_then(|_| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(FieldSealError::KeyfileError(format!(
            "failed to write keyfile: {e}"
        )));
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(FieldSealError::KeyfileError(format!(
            "failed to replace keyfile: {e}"
        )));
    }

    log::debug!("saved {} key(s) to {}", registry.len(), path.display());
    Ok(())
}

/// Unique sibling path for the snapshot being written (PID + timestamp).
fn temp_path_for(parent: &Path, path: &Path) -> PathBuf {
    parent.join(format!(
        ".{}.{}-{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or(0)
    ))
}

/// Create a new file that only the owner can read.
///
/// Fails if anything, a symlink included, already exists at `path`, and
/// the owner-only mode is applied at creation rather than afterwards.
fn create_private_file(path: &Path) -> std::io::Result<File> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)
    }

    #[cfg(not(unix))]
    {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::OsEntropy;
    use crate::registry::KeyRegistry;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_empty_registry() {
        let dir = TempDir::new().unwrap();
        let registry = load_registry(&dir.path().join("keys.json"), OsEntropy).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("keys.json");

        let registry = InMemoryKeyRegistry::new();
        registry.create("users_ssn_key");
        registry.create("users_cc_key");
        save_registry(&path, &registry).unwrap();

        let loaded = load_registry(&path, OsEntropy).unwrap();
        assert_eq!(loaded.key_infos(), registry.key_infos());
        assert_eq!(
            loaded.lookup("users_ssn_key").unwrap().as_bytes(),
            registry.lookup("users_ssn_key").unwrap().as_bytes()
        );
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json");
        save_registry(&path, &InMemoryKeyRegistry::new()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json");
        fs::write(&path, r#"{"version": 9, "keys": []}"#).unwrap();

        let err = load_registry(&path, OsEntropy).err().unwrap();
        assert!(matches!(err, FieldSealError::KeyfileError(_)));
    }

    #[test]
    fn rejects_wrong_key_length() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json");
        let short = BASE64.encode([0u8; 16]);
        fs::write(
            &path,
            format!(
                r#"{{"version":1,"keys":[{{"name":"k","dek":"{short}","created_at":"2024-01-01T00:00:00Z"}}]}}"#
            ),
        )
        .unwrap();

        let err = load_registry(&path, OsEntropy).err().unwrap();
        assert!(err.to_string().contains("32 bytes"));
    }

    #[cfg(unix)]
    #[test]
    fn private_file_refuses_existing_symlink() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("elsewhere.txt");
        fs::write(&target, "").unwrap();
        let link = dir.path().join("link.tmp");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(create_private_file(&link).is_err());
        assert_eq!(fs::read(&target).unwrap().len(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn save_never_writes_through_planted_temp_symlink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json");
        let target = dir.path().join("elsewhere.txt");
        fs::write(&target, "").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join(".keys.json.tmp")).unwrap();

        let registry = InMemoryKeyRegistry::new();
        registry.create("users_ssn_key");
        save_registry(&path, &registry).unwrap();

        assert_eq!(fs::read(&target).unwrap().len(), 0);
        assert!(!fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
        let loaded = load_registry(&path, OsEntropy).unwrap();
        assert!(loaded.contains("users_ssn_key"));
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json");
        let registry = InMemoryKeyRegistry::new();
        registry.create("k");
        save_registry(&path, &registry).unwrap();
        save_registry(&path, &registry).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["keys.json".to_string()]);
    }

    #[test]
    fn rejects_duplicate_key_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json");
        let a = BASE64.encode([1u8; KEY_LEN]);
        let b = BASE64.encode([2u8; KEY_LEN]);
        fs::write(
            &path,
            format!(
                r#"{{"version":1,"keys":[
                    {{"name":"k","dek":"{a}","created_at":"2024-01-01T00:00:00Z"}},
                    {{"name":"k","dek":"{b}","created_at":"2024-01-02T00:00:00Z"}}]}}"#
            ),
        )
        .unwrap();

        let err = load_registry(&path, OsEntropy).err().unwrap();
        assert!(matches!(err, FieldSealError::KeyfileError(_)));
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn stored_key_serializes_zeroizing_dek() {
        let stored = StoredKey {
            name: "k".into(),
            dek: Zeroizing::new(BASE64.encode([3u8; KEY_LEN])),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["dek"], BASE64.encode([3u8; KEY_LEN]));
    }

    #[test]
    fn rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keys.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_registry(&path, OsEntropy).is_err());
    }
}
