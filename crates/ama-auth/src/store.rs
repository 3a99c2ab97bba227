//! User lookup capability consumed by the auth core

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Stored user as seen by the auth core
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Opaque failure from a [`UserStore`] backend
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self(message.to_string())
    }
}

/// Persistence backend able to resolve users for authentication.
///
/// `Ok(None)` means the user does not exist; `Err` is reserved for backend
/// failures such as I/O errors or pool timeouts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact email match
    async fn lookup_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a user by ID
    async fn lookup_user_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;
}
