//! Authenticated identity

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::jwt::Claims;
use crate::store::UserRecord;

/// Authenticated user, stripped of email and password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Principal {
    /// Rebuild a principal from verified access token claims
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let id = claims.user_id().map_err(|_| AuthError::InvalidToken)?;

        Ok(Self {
            id,
            first_name: claims.first_name.clone().unwrap_or_default(),
            last_name: claims.last_name.clone().unwrap_or_default(),
        })
    }
}

impl From<UserRecord> for Principal {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            iss: "example.com".to_string(),
            aud: "example.com".to_string(),
            exp: 0,
            iat: 0,
            first_name: Some("Ada".to_string()),
            last_name: None,
        }
    }

    #[test]
    fn test_from_record_drops_sensitive_fields() {
        let principal = Principal::from(UserRecord {
            id: 7,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: "$argon2id$...".to_string(),
        });

        assert_eq!(
            principal,
            Principal {
                id: 7,
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            }
        );
    }

    #[test]
    fn test_from_claims() {
        let principal = Principal::from_claims(&claims("12")).unwrap();
        assert_eq!(principal.id, 12);
        assert_eq!(principal.first_name, "Ada");
        assert_eq!(principal.last_name, "");
    }

    #[test]
    fn test_from_claims_rejects_non_numeric_subject() {
        let result = Principal::from_claims(&claims("admin"));
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
