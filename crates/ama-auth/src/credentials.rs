//! Email/password verification

use tracing::debug;

use crate::error::AuthError;
use crate::password::verify_password;
use crate::principal::Principal;
use crate::store::UserStore;

/// Valid Argon2 hash that matches no password. Verified against when the
/// email is unknown so both failure paths cost the same.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dW5rbm93bl9hY2NvdW50X3NhbHQ$Ru2eXc0lsNiVZXtZ0d6v0iC4vuspPOIyCu4zqddcKOM";

/// Check an email/password pair against the stored hash.
///
/// Unknown email, wrong password and unreadable hashes all yield
/// [`AuthError::InvalidCredentials`]. Only store failures escape as
/// internal errors.
pub async fn verify_credentials<S>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<Principal, AuthError>
where
    S: UserStore + ?Sized,
{
    let record = store.lookup_user_by_email(email).await?;

    let hash = record
        .as_ref()
        .map(|r| r.password_hash.as_str())
        .unwrap_or(DUMMY_HASH);

    let password_valid = verify_password(password, hash).unwrap_or_else(|e| {
        debug!("Password verification error: {}", e);
        false
    });

    match (record, password_valid) {
        (Some(record), true) => Ok(Principal::from(record)),
        _ => Err(AuthError::InvalidCredentials),
    }
}
