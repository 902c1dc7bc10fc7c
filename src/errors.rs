use thiserror::Error;

/// All errors that can occur in Lockbox.
#[derive(Debug, Error)]
pub enum LockboxError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong password and tampered data are reported identically.
    #[error("Decryption failed; wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("No vault found; run `lockbox init` to create one")]
    VaultNotFound,

    #[error("A vault already exists in this store")]
    VaultAlreadyExists,

    #[error("Vault is locked; unlock it first")]
    VaultLocked,

    #[error("Unsupported vault version {found} (this build reads version {expected})")]
    /// `found` is the raw JSON of the stored `version` (`null` when absent).
    VersionMismatch { found: String, expected: u32 },

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Secret '{0}' not found")]
    SecretNotFound(String),

    #[error("Secret with id '{0}' already exists")]
    SecretAlreadyExists(String),

    #[error("Invalid secret: {0}")]
    Validation(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Clipboard errors ---
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for Lockbox results.
pub type Result<T> = std::result::Result<T, LockboxError>;
