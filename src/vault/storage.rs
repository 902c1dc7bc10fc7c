//! Key-value text storage backing the encrypted container.
//!
//! The session only needs `get` and `set` on a single key; there are no
//! transactional guarantees beyond last-write-wins.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{LockboxError, Result};

/// Default key the container is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "secure_vault_data";

/// A text store addressed by string keys.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LockboxError::Storage(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Write atomically: temp file in the same directory, then rename,
    /// so a reader never sees a half-written container.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            LockboxError::Storage(format!(
                "cannot create vault directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        let written = write_owner_only(&tmp_path, value).and_then(|()| {
            fs::rename(&tmp_path, &path)
                .map_err(|e| LockboxError::Storage(format!("failed to replace vault: {e}")))
        });
        if let Err(e) = written {
            // Best effort: the original error is what the caller needs.
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "container written");
        Ok(())
    }
}

fn write_owner_only(path: &Path, value: &str) -> Result<()> {
    fs::write(path, value)
        .map_err(|e| LockboxError::Storage(format!("failed to write vault: {e}")))?;

    // Owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms).map_err(|e| {
            LockboxError::Storage(format!("failed to set vault permissions: {e}"))
        })?;
    }

    Ok(())
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > 128 {
        return Err(LockboxError::Storage(
            "storage key must be 1-128 characters".into(),
        ));
    }
    if key.starts_with('.')
        || !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(LockboxError::Storage(format!(
            "storage key '{key}' is invalid; only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store, used by tests and embedders with their own persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
