//! User account record.
//!
//! # Responsibility
//! - Define the account shape persisted under the `users` collection.
//!
//! # Invariants
//! - `email` is unique across the collection, compared byte-for-byte
//!   (case-sensitive); uniqueness is enforced by the accessor write path.
//! - Accounts are never deleted once created.

use crate::model::{now_epoch_ms, require_non_empty, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user account.
pub type UserId = Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Account record persisted in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable global ID referenced by `Book::added_by` and `Review::user_id`.
    pub id: UserId,
    pub email: String,
    /// Stored and compared in plaintext; this layer provides no credential
    /// hardening.
    pub password: String,
    /// Display name copied into reviews at write time.
    pub name: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl User {
    /// Creates a new account with a generated stable ID and current
    /// timestamp.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), email, password, name, now_epoch_ms())
    }

    /// Creates an account with a caller-provided ID and timestamp.
    ///
    /// Used by seeding and tests where identity already exists.
    pub fn with_id(
        id: UserId,
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            password: password.into(),
            name: name.into(),
            created_at,
        }
    }

    /// Validates the record before it is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty(&self.email, "email")?;
        require_non_empty(&self.password, "password")?;
        require_non_empty(&self.name, "name")?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}
