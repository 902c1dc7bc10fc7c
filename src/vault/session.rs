//! The vault session: the only owner of key material and plaintext.
//!
//! `VaultSession` moves between three states:
//!
//! - **Uninitialized**: no container in storage.
//! - **Locked**: a container exists, nothing secret is in memory.
//! - **Unlocked**: the derived key, the salt and the decrypted records
//!   are held in memory and the records may be mutated.
//!
//! Every mutation re-encrypts the whole record array under a fresh nonce
//! and writes the container before the in-memory copy is replaced, so a
//! failed write leaves memory exactly as it was.

use crate::crypto::{derive_key, generate_salt, VaultKey, SALT_LEN};
use crate::errors::{LockboxError, Result};

use super::format::{peek_created_at, ContainerInfo, EncryptedContainer, CURRENT_VERSION};
use super::payload::{open_records, seal_records};
use super::secret::{now_millis, SecretRecord};
use super::storage::{KeyValueStore, DEFAULT_STORAGE_KEY};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Locked,
    Unlocked,
}

/// Why a session was locked without an explicit `lock()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoLockReason {
    IdleTimeout,
    Hidden,
}

impl std::fmt::Display for AutoLockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdleTimeout => f.write_str("idle timeout"),
            Self::Hidden => f.write_str("surface hidden"),
        }
    }
}

/// Everything that exists only while unlocked. Dropping it zeroes the
/// key and every record.
struct UnlockedVault {
    key: VaultKey,
    salt: [u8; SALT_LEN],
    records: Vec<SecretRecord>,
}

/// A single vault session over a key-value store.
///
/// Calls must be serialized by the caller; the session does no locking
/// of its own.
pub struct VaultSession<S: KeyValueStore> {
    store: S,
    storage_key: String,
    unlocked: Option<UnlockedVault>,
}

impl<S: KeyValueStore> VaultSession<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a locked session using the default storage key.
    pub fn new(store: S) -> Self {
        Self::with_storage_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Create a locked session that keeps its container under `storage_key`.
    pub fn with_storage_key(store: S, storage_key: &str) -> Self {
        Self {
            store,
            storage_key: storage_key.to_string(),
            unlocked: None,
        }
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Returns `true` if a container exists in storage.
    pub fn has_vault(&self) -> Result<bool> {
        Ok(self.store.get(&self.storage_key)?.is_some())
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.is_some()
    }

    pub fn state(&self) -> Result<SessionState> {
        if self.is_unlocked() {
            Ok(SessionState::Unlocked)
        } else if self.has_vault()? {
            Ok(SessionState::Locked)
        } else {
            Ok(SessionState::Uninitialized)
        }
    }

    /// Read the non-secret envelope metadata without unlocking.
    ///
    /// Returns `None` when no vault exists.
    pub fn container_info(&self) -> Result<Option<ContainerInfo>> {
        match self.store.get(&self.storage_key)? {
            Some(text) => Ok(Some(EncryptedContainer::decode(&text)?.info())),
            None => Ok(None),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a new, empty vault and leave the session unlocked.
    ///
    /// Refuses to overwrite an existing container. If the write fails the
    /// session stays exactly as it was.
    pub fn create_vault(&mut self, password: &[u8]) -> Result<()> {
        if self.has_vault()? {
            return Err(LockboxError::VaultAlreadyExists);
        }

        let salt = generate_salt();
        let key = derive_key(password, &salt)?;
        let records = Vec::new();

        let (cipher_text, iv) = seal_records(&records, &key)?;
        let now = now_millis();
        let container = EncryptedContainer {
            cipher_text,
            iv: iv.to_vec(),
            salt: salt.to_vec(),
            version: CURRENT_VERSION,
            created_at: now,
            updated_at: now,
        };

        self.store.set(&self.storage_key, &container.encode()?)?;

        self.unlocked = Some(UnlockedVault { key, salt, records });
        tracing::info!(storage_key = %self.storage_key, "vault created");
        Ok(())
    }

    /// Re-derive the key from `password` and decrypt the stored vault.
    ///
    /// On any failure the session ends up locked, with no key material
    /// from this or any earlier unlock left in memory. A wrong password
    /// and a tampered container both yield `DecryptionFailed`.
    pub fn unlock(&mut self, password: &[u8]) -> Result<()> {
        self.unlocked = None;

        match self.open(password) {
            Ok(vault) => {
                tracing::info!(secrets = vault.records.len(), "vault unlocked");
                self.unlocked = Some(vault);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "unlock failed");
                Err(e)
            }
        }
    }

    fn open(&self, password: &[u8]) -> Result<UnlockedVault> {
        let text = self
            .store
            .get(&self.storage_key)?
            .ok_or(LockboxError::VaultNotFound)?;
        let container = EncryptedContainer::decode(&text)?;

        let key = derive_key(password, &container.salt)?;
        let records = open_records(&container.cipher_text, &container.iv, &key)?;

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&container.salt);

        Ok(UnlockedVault { key, salt, records })
    }

    /// Drop the key and all decrypted records. Idempotent.
    pub fn lock(&mut self) {
        if self.unlocked.take().is_some() {
            tracing::info!("vault locked");
        }
    }

    /// Hook for the idle scheduler: the inactivity period has elapsed.
    pub fn on_idle_timeout(&mut self) {
        self.auto_lock(AutoLockReason::IdleTimeout);
    }

    /// Hook for the host surface: it was hidden or backgrounded.
    ///
    /// Only embedders with a visibility signal (a window, a tab) call this.
    /// The terminal shell has none and relies on the idle timeout.
    pub fn on_hidden(&mut self) {
        self.auto_lock(AutoLockReason::Hidden);
    }

    fn auto_lock(&mut self, reason: AutoLockReason) {
        if self.unlocked.take().is_some() {
            tracing::info!(%reason, "vault auto-locked");
        }
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// All records in insertion order.
    pub fn list_secrets(&self) -> Result<&[SecretRecord]> {
        Ok(&self.vault()?.records)
    }

    pub fn find_secret(&self, id: &str) -> Result<Option<&SecretRecord>> {
        Ok(self.list_secrets()?.iter().find(|r| r.id == id))
    }

    /// Records whose name or username contains `query`, ignoring case.
    /// An empty query returns everything.
    pub fn search_secrets(&self, query: &str) -> Result<Vec<&SecretRecord>> {
        let records = self.list_secrets()?;
        if query.is_empty() {
            return Ok(records.iter().collect());
        }
        Ok(records.iter().filter(|r| r.matches(query)).collect())
    }

    /// Append a record and save.
    pub fn add_secret(&mut self, record: SecretRecord) -> Result<()> {
        let current = &self.vault()?.records;
        record.validate()?;
        if current.iter().any(|r| r.id == record.id) {
            return Err(LockboxError::SecretAlreadyExists(record.id.clone()));
        }

        let mut next = current.clone();
        next.push(record);
        self.save(next)
    }

    /// Replace the record with the same id and save.
    ///
    /// The stored `created_at` is kept. An unknown id leaves the records
    /// unchanged but still saves.
    pub fn update_secret(&mut self, record: SecretRecord) -> Result<()> {
        let current = &self.vault()?.records;
        record.validate()?;

        let next = current
            .iter()
            .map(|existing| {
                if existing.id == record.id {
                    let mut replacement = record.clone();
                    replacement.created_at = existing.created_at;
                    replacement
                } else {
                    existing.clone()
                }
            })
            .collect();
        self.save(next)
    }

    /// Remove the record with `id` and save. An unknown id still saves.
    pub fn delete_secret(&mut self, id: &str) -> Result<()> {
        let next = self
            .vault()?
            .records
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.save(next)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt `records` under the held key with a fresh nonce, write the
    /// container, and only then adopt `records` as the in-memory vault.
    fn save(&mut self, records: Vec<SecretRecord>) -> Result<()> {
        let vault = self.unlocked.as_mut().ok_or(LockboxError::VaultLocked)?;

        let (cipher_text, iv) = seal_records(&records, &vault.key)?;

        let now = now_millis();
        let created_at = match self.store.get(&self.storage_key) {
            Ok(Some(text)) => peek_created_at(&text).unwrap_or(now),
            Ok(None) => now,
            Err(e) => {
                tracing::warn!(error = %e, "could not read existing container; resetting createdAt");
                now
            }
        };

        let container = EncryptedContainer {
            cipher_text,
            iv: iv.to_vec(),
            salt: vault.salt.to_vec(),
            version: CURRENT_VERSION,
            created_at,
            updated_at: now,
        };
        self.store.set(&self.storage_key, &container.encode()?)?;

        tracing::debug!(secrets = records.len(), "vault saved");
        vault.records = records;
        Ok(())
    }

    fn vault(&self) -> Result<&UnlockedVault> {
        self.unlocked.as_ref().ok_or(LockboxError::VaultLocked)
    }
}
