//! AMA Authentication
//!
//! This crate provides credential verification, JWT access/refresh token
//! issuance with rotation, the refresh cookie codec and the bearer-token
//! middleware for the AMA service. It knows nothing about the storage
//! engine: user lookups go through the [`UserStore`] capability.

pub mod config;
pub mod cookie;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod principal;
pub mod refresh;
pub mod store;

pub use config::AuthConfig;
pub use cookie::{CookieCodec, RefreshCookie};
pub use credentials::verify_credentials;
pub use error::{AuthError, AuthErrorKind};
pub use jwt::{Claims, JwtManager, TokenPair};
pub use middleware::auth_middleware;
pub use password::{hash_password, verify_password};
pub use principal::Principal;
pub use refresh::refresh_tokens;
pub use store::{StoreError, UserRecord, UserStore};
