//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is fixed so that a vault can always re-derive
//! the key it was created with: the envelope stores only the salt.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use sha2::Sha256;

use super::keys::{VaultKey, KEY_LEN};
use crate::errors::{LockboxError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// PBKDF2 iteration count (hardening against offline guessing).
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive the vault key from a password and salt.
///
/// The same password + salt always produces the same key.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<VaultKey> {
    if salt.len() != SALT_LEN {
        return Err(LockboxError::KeyDerivationFailed(format!(
            "salt must be exactly {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }

    let mut key = VaultKey::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, key.as_mut_bytes());

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt from the OS RNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
