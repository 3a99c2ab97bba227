//! JWT token management

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::principal::Principal;

/// JWT claims
///
/// Access and refresh tokens share this shape and differ only in `exp`.
/// Which kind is expected is decided by where the token was presented.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Claims {
    /// Parse the subject back into a user ID
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::UnknownUser)
    }

    /// A token is expired from its `exp` second onwards
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// Freshly minted access/refresh pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT manager for token issuance and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue an access/refresh pair for a principal
    pub fn issue(&self, principal: &Principal) -> Result<TokenPair, AuthError> {
        self.issue_at(principal, Utc::now())
    }

    fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<TokenPair, AuthError> {
        debug!("Issuing token pair for user: {}", principal.id);

        let access = self.claims_for(principal, now, self.access_ttl)?;
        let refresh = self.claims_for(principal, now, self.refresh_ttl)?;

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        })
    }

    fn claims_for(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Claims, AuthError> {
        let expires = now
            .checked_add_signed(ttl)
            .ok_or(AuthError::LifetimeOverflow)?;

        Ok(Claims {
            sub: principal.id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
            first_name: Some(principal.first_name.clone()),
            last_name: Some(principal.last_name.clone()),
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(AuthError::Signing)
    }

    /// Validate a JWT token and return claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    debug!("Rejected token: {}", e);
                    AuthError::InvalidToken
                }
            },
        )?;

        // jsonwebtoken still accepts exp == now
        if token_data.claims.is_expired_at(Utc::now().timestamp()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
