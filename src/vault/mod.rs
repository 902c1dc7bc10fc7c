//! Vault module: encrypted record storage and the session lifecycle.
//!
//! This module provides:
//! - The `SecretRecord` type (`secret`)
//! - The versioned JSON envelope codec (`format`)
//! - Record sealing under AES-GCM (`payload`)
//! - Key-value persistence backends (`storage`)
//! - The locked/unlocked `VaultSession` (`session`)
//! - Idle tracking for auto-lock (`autolock`)

pub mod autolock;
pub mod format;
pub mod payload;
pub mod secret;
pub mod session;
pub mod storage;

// Re-export the most commonly used items.
pub use autolock::{IdleWatch, IDLE_TIMEOUT};
pub use format::{ContainerInfo, EncryptedContainer, CURRENT_VERSION};
pub use secret::SecretRecord;
pub use session::{AutoLockReason, SessionState, VaultSession};
pub use storage::{FileStore, KeyValueStore, MemoryStore, DEFAULT_STORAGE_KEY};
