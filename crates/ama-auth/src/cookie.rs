//! Refresh token cookie handling

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Refresh cookie ready to be rendered into a `Set-Cookie` header
///
/// Always rendered with `SameSite=Strict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: String,
    /// Seconds; zero or negative asks the client to drop the cookie now
    pub max_age: i64,
    pub expires: DateTime<Utc>,
    pub http_only: bool,
    pub secure: bool,
}

impl fmt::Display for RefreshCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if !self.path.is_empty() {
            write!(f, "; Path={}", self.path)?;
        }
        if !self.domain.is_empty() {
            write!(f, "; Domain={}", self.domain)?;
        }
        // Max-Age must be non-negative on the wire
        write!(f, "; Max-Age={}", self.max_age.max(0))?;
        write!(
            f,
            "; Expires={}",
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT")
        )?;
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        f.write_str("; SameSite=Strict")
    }
}

/// Wraps refresh tokens into scoped cookies and reads them back
#[derive(Debug, Clone)]
pub struct CookieCodec {
    name: String,
    domain: String,
    path: String,
    secure: bool,
    refresh_ttl: Duration,
}

impl CookieCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            domain: config.cookie_domain.clone(),
            path: config.cookie_path.clone(),
            secure: config.cookie_secure,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the cookie carrying a freshly issued refresh token
    pub fn wrap(&self, refresh_token: &str) -> Result<RefreshCookie, AuthError> {
        let expires = Utc::now()
            .checked_add_signed(self.refresh_ttl)
            .ok_or(AuthError::LifetimeOverflow)?;

        Ok(self.build(
            refresh_token.to_string(),
            self.refresh_ttl.num_seconds(),
            expires,
        ))
    }

    /// Build the logout cookie that makes the client drop the refresh token
    pub fn expire(&self) -> RefreshCookie {
        self.build(String::new(), -1, DateTime::<Utc>::UNIX_EPOCH)
    }

    fn build(&self, value: String, max_age: i64, expires: DateTime<Utc>) -> RefreshCookie {
        RefreshCookie {
            name: self.name.clone(),
            value,
            path: self.path.clone(),
            domain: self.domain.clone(),
            max_age,
            expires,
            http_only: true,
            secure: self.secure,
        }
    }

    /// Extract the refresh token from the request's `Cookie` headers
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|part| part.trim().split_once('='))
            .find(|(key, _)| key.trim() == self.name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }
}
