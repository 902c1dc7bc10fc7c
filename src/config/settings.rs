use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LockboxError, Result};

/// Project-level configuration, loaded from `.lockbox.toml`.
///
/// Every field has a sensible default so Lockbox works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the vault.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Storage key the encrypted container is written under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Length of passwords produced by `add --generate` and `generate`.
    #[serde(default = "default_generated_password_length")]
    pub generated_password_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".lockbox".to_string()
}

fn default_storage_key() -> String {
    crate::vault::DEFAULT_STORAGE_KEY.to_string()
}

fn default_generated_password_length() -> usize {
    crate::crypto::generator::DEFAULT_LENGTH
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            storage_key: default_storage_key(),
            generated_password_length: default_generated_password_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    const FILE_NAME: &'static str = ".lockbox.toml";

    /// Load settings from `<project_dir>/.lockbox.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            LockboxError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the vault directory against `project_dir`.
    ///
    /// An explicit override (CLI flag or env var) wins over the config file.
    pub fn vault_dir(&self, project_dir: &Path, override_dir: Option<&str>) -> PathBuf {
        project_dir.join(override_dir.unwrap_or(self.vault_dir.as_str()))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
