//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Query, pool or connection failure, including acquire timeouts
    #[error("SQLite error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}
