//! `UserStore` backend for the auth core

use ama_auth::{StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use tracing::debug;

use crate::repository::Database;

#[async_trait]
impl UserStore for Database {
    async fn lookup_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        debug!("Looking up user by email");
        self.get_user_by_email(email)
            .await
            .map(|user| user.map(UserRecord::from))
            .map_err(StoreError::new)
    }

    async fn lookup_user_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        debug!("Looking up user {}", id);
        self.get_user_by_id(id)
            .await
            .map(|user| user.map(UserRecord::from))
            .map_err(StoreError::new)
    }
}
