//! Login, refresh and logout routes

use ama_auth::{AuthError, AuthErrorKind, refresh_tokens, verify_credentials};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::LoginRequest;

// ==================== Input Validation ====================

/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 255;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;

fn outcome(error: &AuthError) -> &'static str {
    match error.kind() {
        AuthErrorKind::Internal => "error",
        _ => "rejected",
    }
}

// ==================== Auth Routes ====================

/// POST /authenticate
async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;

    // Oversized input is treated like any other bad login
    if request.email.len() > MAX_EMAIL_LENGTH || request.password.len() > MAX_PASSWORD_LENGTH {
        metrics::counter!("ama_auth_logins_total", "outcome" => "rejected").increment(1);
        return Err(AuthError::InvalidCredentials.into());
    }

    debug!("Login attempt");

    let principal = match verify_credentials(&state.db, &request.email, &request.password).await {
        Ok(principal) => principal,
        Err(e) => {
            metrics::counter!("ama_auth_logins_total", "outcome" => outcome(&e)).increment(1);
            return Err(e.into());
        }
    };

    let tokens = state.jwt.issue(&principal)?;
    let cookie = state.cookies.wrap(&tokens.refresh_token)?;

    metrics::counter!("ama_auth_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in", principal.id);

    Ok((
        StatusCode::ACCEPTED,
        [(SET_COOKIE, cookie.to_string())],
        Json(tokens),
    )
        .into_response())
}

/// GET /refresh
async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let result = match state.cookies.read(&headers) {
        Some(token) => refresh_tokens(&state.db, &state.jwt, token).await,
        None => Err(AuthError::MissingRefreshCookie),
    };

    let tokens = match result {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("Refresh rejected: {}", e);
            metrics::counter!("ama_auth_refresh_total", "outcome" => outcome(&e)).increment(1);
            return Err(e.into());
        }
    };

    let cookie = state.cookies.wrap(&tokens.refresh_token)?;
    metrics::counter!("ama_auth_refresh_total", "outcome" => "success").increment(1);

    Ok((
        StatusCode::ACCEPTED,
        [(SET_COOKIE, cookie.to_string())],
        Json(tokens),
    )
        .into_response())
}

/// GET /logout
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::ACCEPTED,
        [(SET_COOKIE, state.cookies.expire().to_string())],
    )
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/authenticate", post(authenticate))
        .route("/refresh", get(refresh))
        .route("/logout", get(logout))
}
