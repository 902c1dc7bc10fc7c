//! Sealing and opening the record array.
//!
//! The plaintext is the JSON array of records; it only ever exists in
//! zeroizing buffers.

use zeroize::Zeroizing;

use super::secret::SecretRecord;
use crate::crypto::{decrypt, encrypt, VaultKey, NONCE_LEN};
use crate::errors::{LockboxError, Result};

/// Serialize `records` and encrypt them under `key` with a fresh nonce.
pub fn seal_records(
    records: &[SecretRecord],
    key: &VaultKey,
) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(records)
            .map_err(|e| LockboxError::SerializationError(format!("records: {e}")))?,
    );
    encrypt(key, &plaintext)
}

/// Decrypt and parse a record array.
///
/// A payload that authenticates but does not parse is reported the same
/// way as a failed tag.
pub fn open_records(cipher_text: &[u8], nonce: &[u8], key: &VaultKey) -> Result<Vec<SecretRecord>> {
    let plaintext = decrypt(key, cipher_text, nonce)?;
    serde_json::from_slice(&plaintext).map_err(|_| LockboxError::DecryptionFailed)
}
