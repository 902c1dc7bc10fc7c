//! The `SecretRecord` type stored inside a vault.
//!
//! Records only ever reach storage as part of the encrypted record
//! array; their fields are wiped from memory when dropped.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{LockboxError, Result};

/// A single stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SecretRecord {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,

    /// Display name (e.g. "Mail").
    pub name: String,

    pub username: String,

    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation time in epoch milliseconds. Never changes after creation.
    pub created_at: i64,
}

impl SecretRecord {
    /// Build a new record with a fresh random id and the current time.
    ///
    /// Empty or whitespace-only notes are stored as `None`.
    pub fn new(name: &str, username: &str, password: &str, notes: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            notes: notes
                .filter(|n| !n.trim().is_empty())
                .map(ToString::to_string),
            created_at: now_millis(),
        }
    }

    /// Check that all required fields are present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("id", &self.id),
            ("name", &self.name),
            ("username", &self.username),
            ("password", &self.password),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(LockboxError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }

    /// Case-insensitive substring match on name or username.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.username.to_lowercase().contains(&query)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
