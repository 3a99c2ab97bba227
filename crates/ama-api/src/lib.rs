//! AMA REST API
//!
//! This crate provides the Axum-based HTTP API for the AMA service:
//! login, refresh-token rotation and logout, the public question board
//! and the bearer-protected admin routes.

pub mod cors;
pub mod error;
pub mod routes;
pub mod state;

pub use cors::cors_layer;
pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
