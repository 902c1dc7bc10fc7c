//! Cryptographic primitives for Lockbox.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The zeroizing `VaultKey` wrapper (`keys`)
//! - Random password generation (`generator`)

pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, NONCE_LEN};
pub use generator::generate_password;
pub use kdf::{derive_key, generate_salt, PBKDF2_ITERATIONS, SALT_LEN};
pub use keys::VaultKey;
