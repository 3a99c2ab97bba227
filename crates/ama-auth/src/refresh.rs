//! Refresh token rotation
//!
//! Each successful refresh mints a brand-new access/refresh pair. Nothing is
//! stored server-side, so a superseded refresh token is not invalidated and
//! stays usable until its own `exp`.

use tracing::debug;

use crate::error::AuthError;
use crate::jwt::{JwtManager, TokenPair};
use crate::principal::Principal;
use crate::store::UserStore;

/// Exchange a refresh token for a new token pair.
///
/// The principal is rebuilt from the current user record rather than from
/// the token, so renamed users get updated claims and deleted users are
/// rejected with [`AuthError::UnknownUser`].
pub async fn refresh_tokens<S>(
    store: &S,
    jwt: &JwtManager,
    refresh_token: &str,
) -> Result<TokenPair, AuthError>
where
    S: UserStore + ?Sized,
{
    let claims = jwt.validate(refresh_token)?;
    let user_id = claims.user_id()?;

    let record = store
        .lookup_user_by_id(user_id)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    let principal = Principal::from(record);
    debug!("Rotating tokens for user: {}", principal.id);

    jwt.issue(&principal)
}
