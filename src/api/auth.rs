//! Token endpoints and the bearer-token extractor.
//!
//! `POST /api/token` exchanges credentials for an access/refresh pair;
//! `POST /api/token/refresh` exchanges a live refresh token for a fresh pair.
//! [`CurrentUser`] resolves the Authorization header to a loaded account so
//! protected handlers receive the principal as a plain value.

use crate::{
    api::AppState,
    auth::{self, TokenPair},
    core,
    entities::user,
    errors::{Error, Result},
};
use axum::{
    Json, async_trait,
    extract::{FromRequestParts, State},
    http::{header, request::Parts},
};
use serde::Deserialize;

/// Credentials for obtaining a token pair
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// A refresh-token exchange request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// A live refresh token
    pub refresh: String,
}

/// `POST /api/token` - issues a token pair for valid credentials.
///
/// # Errors
/// Returns `InvalidCredentials` for an unknown email, an inactive account, or
/// a wrong password; the three cases are indistinguishable to the caller.
pub async fn obtain_token_pair(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenPair>> {
    let user = core::user::get_user_by_email(&state.db, &body.email)
        .await?
        .filter(|user| user.is_active)
        .ok_or(Error::InvalidCredentials)?;

    if !auth::verify_password(&body.password, &user.password_hash)? {
        return Err(Error::InvalidCredentials);
    }

    Ok(Json(auth::issue_token_pair(&state.settings.auth, &user)?))
}

/// `POST /api/token/refresh` - exchanges a refresh token for a fresh pair.
///
/// # Errors
/// Returns an unauthorized error if the token is invalid, expired, not a
/// refresh token, or its account is gone or inactive.
pub async fn refresh_token_pair(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>> {
    let claims = auth::verify_refresh_token(&state.settings.auth, &body.refresh)?;

    let user = core::user::get_user_by_id(&state.db, claims.sub)
        .await?
        .filter(|user| user.is_active && !user.is_deleted)
        .ok_or(Error::InvalidCredentials)?;

    Ok(Json(auth::issue_token_pair(&state.settings.auth, &user)?))
}

/// The authenticated principal, extracted from the Authorization header.
///
/// Handlers taking this parameter reject unauthenticated requests with 401
/// before any business logic runs.
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| Error::Unauthorized {
                message: "missing Authorization header".to_string(),
            })?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Unauthorized {
                message: "expected a bearer token".to_string(),
            })?;

        let claims = auth::verify_access_token(&state.settings.auth, token)?;

        let user = core::user::get_user_by_id(&state.db, claims.sub)
            .await?
            .filter(|user| user.is_active && !user.is_deleted)
            .ok_or_else(|| Error::Unauthorized {
                message: "account is not active".to_string(),
            })?;

        Ok(Self(user))
    }
}
