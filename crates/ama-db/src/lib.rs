//! AMA Database Layer
//!
//! This crate provides the persistence layer for the AMA service,
//! using SQLite via sqlx. It also supplies the `UserStore` backend
//! consumed by `ama-auth`.

pub mod error;
pub mod models;
pub mod repository;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
