use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{FieldSealError, Result};

/// Project-level configuration, loaded from `.fieldseal.toml`.
///
/// Every field has a default, so FieldSeal works without any config
/// file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Registry snapshot path, relative to the project root.
    #[serde(default = "default_keyfile")]
    pub keyfile: String,

    /// Key name used by `encrypt`/`decrypt` when `--key` is omitted.
    #[serde(default)]
    pub default_key: Option<String>,

    /// Iterations per direction for `bench` (default: 1000).
    #[serde(default = "default_bench_iterations")]
    pub bench_iterations: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_keyfile() -> String {
    ".fieldseal/keys.json".to_string()
}

fn default_bench_iterations() -> u32 {
    1_000
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            keyfile: default_keyfile(),
            default_key: None,
            bench_iterations: default_bench_iterations(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".fieldseal.toml";

    /// Load settings from `<project_dir>/.fieldseal.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            FieldSealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.bench_iterations == 0 {
            return Err(FieldSealError::ConfigError(
                "bench_iterations must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    /// Full path of the registry snapshot for a project.
    ///
    /// Example: `project_dir/.fieldseal/keys.json`
    pub fn keyfile_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.keyfile)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
