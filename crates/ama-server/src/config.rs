//! Configuration loading and management

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Secret shipped in the default configuration
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Upper bound for either token TTL (ten years)
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Upper bound on waiting for a pooled connection
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: i64,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_cookie_domain")]
    pub cookie_domain: String,
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// First user, created when the user table is empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_seed_email")]
    pub email: String,
    #[serde(default = "default_seed_password")]
    pub password: String,
    #[serde(default = "default_seed_first_name")]
    pub first_name: String,
    #[serde(default = "default_seed_last_name")]
    pub last_name: String,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "./data/ama.db".to_string()
}

fn default_acquire_timeout_secs() -> u64 {
    3
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_jwt_issuer() -> String {
    "example.com".to_string()
}

fn default_jwt_audience() -> String {
    "example.com".to_string()
}

fn default_access_token_ttl_secs() -> i64 {
    ama_auth::config::DEFAULT_ACCESS_TTL_SECS
}

fn default_refresh_token_ttl_secs() -> i64 {
    ama_auth::config::DEFAULT_REFRESH_TTL_SECS
}

fn default_cookie_name() -> String {
    ama_auth::config::DEFAULT_COOKIE_NAME.to_string()
}

fn default_cookie_domain() -> String {
    "localhost".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_cookie_secure() -> bool {
    true
}

fn default_seed_email() -> String {
    "admin@example.com".to_string()
}

fn default_seed_password() -> String {
    "secret".to_string()
}

fn default_seed_first_name() -> String {
    "Admin".to_string()
}

fn default_seed_last_name() -> String {
    "User".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            jwt_audience: default_jwt_audience(),
            access_token_ttl_secs: default_access_token_ttl_secs(),
            refresh_token_ttl_secs: default_refresh_token_ttl_secs(),
            cookie_name: default_cookie_name(),
            cookie_domain: default_cookie_domain(),
            cookie_path: default_cookie_path(),
            cookie_secure: default_cookie_secure(),
            seed: SeedConfig::default(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            email: default_seed_email(),
            password: default_seed_password(),
            first_name: default_seed_first_name(),
            last_name: default_seed_last_name(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        // Check if config file exists
        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// sqlx connection URL, creating the file on first use
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database.path)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.database.acquire_timeout_secs)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.auth.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// Build the immutable settings handed to the auth layer
    pub fn to_auth_config(&self) -> Result<ama_auth::AuthConfig> {
        let auth = &self.auth;
        let mut config =
            ama_auth::AuthConfig::new(&auth.jwt_secret, &auth.jwt_issuer, &auth.jwt_audience);
        config.access_ttl = token_ttl("access_token_ttl_secs", auth.access_token_ttl_secs)?;
        config.refresh_ttl = token_ttl("refresh_token_ttl_secs", auth.refresh_token_ttl_secs)?;
        config.cookie_name = auth.cookie_name.clone();
        config.cookie_domain = auth.cookie_domain.clone();
        config.cookie_path = auth.cookie_path.clone();
        config.cookie_secure = auth.cookie_secure;
        Ok(config)
    }
}

fn token_ttl(key: &str, secs: i64) -> Result<chrono::Duration> {
    if secs <= 0 {
        bail!("auth.{} must be positive, got {}", key, secs);
    }
    if secs > MAX_TOKEN_TTL_SECS {
        bail!(
            "auth.{} must be at most {} seconds, got {}",
            key,
            MAX_TOKEN_TTL_SECS,
            secs
        );
    }
    chrono::Duration::try_seconds(secs).with_context(|| format!("auth.{} is out of range", key))
}
