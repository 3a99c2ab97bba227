//! Authentication settings

use chrono::Duration;
use std::fmt;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 3600;
/// Default refresh cookie name
pub const DEFAULT_COOKIE_NAME: &str = "refresh_token";

/// Immutable authentication settings, built once at startup.
///
/// The refresh TTL is expected to be longer than the access TTL. Nothing
/// here enforces that ordering; see [`AuthConfig::ttl_ordering_holds`].
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HMAC signing secret
    pub secret: String,
    /// `iss` claim written into and required from every token
    pub issuer: String,
    /// `aud` claim written into and required from every token
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub cookie_name: String,
    pub cookie_domain: String,
    pub cookie_path: String,
    /// Emit the `Secure` attribute on the refresh cookie
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Create settings with the default lifetimes and cookie scope
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        Self {
            secret: secret.to_string(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_domain: "localhost".to_string(),
            cookie_path: "/".to_string(),
            cookie_secure: true,
        }
    }

    pub fn ttl_ordering_holds(&self) -> bool {
        self.refresh_ttl > self.access_ttl
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_path", &self.cookie_path)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}
