//! Random password generation for new secrets.

use rand::Rng;
use zeroize::Zeroizing;

use crate::errors::{LockboxError, Result};

/// Characters a generated password is drawn from.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+";

/// Default generated password length.
pub const DEFAULT_LENGTH: usize = 16;

/// Shortest password `generate_password` will produce.
pub const MIN_LENGTH: usize = 4;

/// Longest password `generate_password` will produce.
pub const MAX_LENGTH: usize = 256;

/// Generate a random password of `length` characters.
///
/// Uses the thread-local CSPRNG, seeded from the OS.
pub fn generate_password(length: usize) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(LockboxError::Validation(format!(
            "generated password length must be between {MIN_LENGTH} and {MAX_LENGTH} (got {length})"
        )));
    }

    let mut rng = rand::rng();
    let mut password = Zeroizing::new(String::with_capacity(length));
    for _ in 0..length {
        let idx = rng.random_range(0..CHARSET.len());
        password.push(char::from(CHARSET[idx]));
    }

    Ok(password)
}
