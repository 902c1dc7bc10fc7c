//! Encrypted container envelope and its text codec.
//!
//! The whole vault is persisted as one JSON object under a single
//! storage key:
//!
//! ```text
//! {
//!   "cipherText": "<base64>",
//!   "iv":         "<base64, 12 raw bytes>",
//!   "salt":       "<base64, 16 raw bytes>",
//!   "version":    1,
//!   "createdAt":  <epoch ms>,
//!   "updatedAt":  <epoch ms>
//! }
//! ```
//!
//! Decoding reads `version` on its own first, so an envelope written
//! by a different format version is refused before any of its other
//! fields are interpreted.

use serde::{Deserialize, Serialize};

use crate::crypto::SALT_LEN;
use crate::errors::{LockboxError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current envelope format version.
pub const CURRENT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// EncryptedContainer
// ---------------------------------------------------------------------------

/// The persisted envelope. Contains ciphertext and metadata, never
/// plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedContainer {
    /// AES-GCM ciphertext of the record array, tag included.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub cipher_text: Vec<u8>,

    /// Per-save nonce.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub iv: Vec<u8>,

    /// Per-vault KDF salt, fixed for the vault's lifetime.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    pub version: u32,

    /// Set once at vault creation (epoch ms).
    pub created_at: i64,

    /// Refreshed on every save (epoch ms).
    #[serde(default)]
    pub updated_at: i64,
}

/// Non-secret envelope metadata, readable while locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerInfo {
    pub version: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedAtProbe {
    created_at: i64,
}

impl EncryptedContainer {
    /// Serialize the envelope to its JSON text form.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| LockboxError::SerializationError(format!("container: {e}")))
    }

    /// Parse an envelope, refusing any unsupported version.
    ///
    /// Anything in `version` other than the integer `CURRENT_VERSION`
    /// (a missing field, `null`, a string, a float, a negative or
    /// oversized number) is a version mismatch, not a format error.
    pub fn decode(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| LockboxError::InvalidVaultFormat(format!("container JSON: {e}")))?;
        let fields = value.as_object().ok_or_else(|| {
            LockboxError::InvalidVaultFormat("container is not a JSON object".into())
        })?;

        let version = fields.get("version").cloned().unwrap_or_default();
        if version.as_u64() != Some(u64::from(CURRENT_VERSION)) {
            return Err(LockboxError::VersionMismatch {
                found: version.to_string(),
                expected: CURRENT_VERSION,
            });
        }

        let container: Self = serde_json::from_value(value)
            .map_err(|e| LockboxError::InvalidVaultFormat(format!("container JSON: {e}")))?;

        if container.salt.len() != SALT_LEN {
            return Err(LockboxError::InvalidVaultFormat(format!(
                "salt must be {SALT_LEN} bytes, got {}",
                container.salt.len()
            )));
        }

        Ok(container)
    }

    pub fn info(&self) -> ContainerInfo {
        ContainerInfo {
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Read only `createdAt` from stored envelope text.
///
/// Returns `None` when the text is not an object with an integer
/// `createdAt`; callers fall back to the current time.
pub fn peek_created_at(text: &str) -> Option<i64> {
    serde_json::from_str::<CreatedAtProbe>(text)
        .ok()
        .map(|p| p.created_at)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

// ── Tests ────────────────────────────────────────────────────────────
