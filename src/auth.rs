//! Token-based authentication and password hashing.
//!
//! Issues and verifies JWT access/refresh token pairs and wraps Argon2
//! password hashing. The rest of the backend never reads ambient auth state:
//! handlers resolve a token to a user here and thread the principal's id into
//! business logic as an explicit parameter.

use crate::{
    config::settings::AuthSettings,
    entities::user,
    errors::{Error, Result},
};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Marker for tokens that grant API access
pub const TOKEN_TYPE_ACCESS: &str = "access";
/// Marker for tokens that may only be exchanged for a new pair
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Claims carried by every issued token.
///
/// The email claim mirrors the subject's login email so clients can identify
/// the account without an extra round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued to
    pub sub: i64,
    /// Login email of the subject
    pub email: String,
    /// `"access"` or `"refresh"`
    pub token_type: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// An access/refresh token pair as returned by the token endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived token for API requests
    pub access: String,
    /// Long-lived token for obtaining fresh pairs
    pub refresh: String,
}

/// Hashes a password with Argon2 and a fresh random salt.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks a candidate password against a stored Argon2 hash.
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn encode_token(
    settings: &AuthSettings,
    user: &user::Model,
    token_type: &str,
    lifetime: Duration,
) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        token_type: token_type.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(Into::into)
}

/// Issues a fresh access/refresh token pair for the given user.
///
/// # Errors
/// Returns an error if token signing fails.
pub fn issue_token_pair(settings: &AuthSettings, user: &user::Model) -> Result<TokenPair> {
    Ok(TokenPair {
        access: encode_token(
            settings,
            user,
            TOKEN_TYPE_ACCESS,
            Duration::minutes(settings.access_token_minutes),
        )?,
        refresh: encode_token(
            settings,
            user,
            TOKEN_TYPE_REFRESH,
            Duration::days(settings.refresh_token_days),
        )?,
    })
}

fn decode_token(settings: &AuthSettings, token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Verifies an access token and returns its claims.
///
/// Refresh tokens are rejected here so a long-lived refresh token can never
/// be used to call the API directly.
///
/// # Errors
/// Returns an error if the token is invalid, expired, or not an access token.
pub fn verify_access_token(settings: &AuthSettings, token: &str) -> Result<Claims> {
    let claims = decode_token(settings, token)?;
    if claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(Error::Unauthorized {
            message: "access token required".to_string(),
        });
    }
    Ok(claims)
}

/// Verifies a refresh token and returns its claims.
///
/// # Errors
/// Returns an error if the token is invalid, expired, or not a refresh token.
pub fn verify_refresh_token(settings: &AuthSettings, token: &str) -> Result<Claims> {
    let claims = decode_token(settings, token)?;
    if claims.token_type != TOKEN_TYPE_REFRESH {
        return Err(Error::Unauthorized {
            message: "refresh token required".to_string(),
        });
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use uuid::Uuid;

    fn test_settings() -> AuthSettings {
        AuthSettings {
            access_token_minutes: 15,
            refresh_token_days: 7,
            jwt_secret: "test-secret".to_string(),
        }
    }

    fn test_user() -> user::Model {
        let now = Utc::now();
        user::Model {
            id: 42,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            user_uuid: Uuid::new_v4(),
            password_hash: String::new(),
            phone_number: "555-0100".to_string(),
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() -> Result<()> {
        let hash = hash_password("hunter2hunter2")?;
        assert_ne!(hash, "hunter2hunter2");
        assert!(verify_password("hunter2hunter2", &hash)?);
        assert!(!verify_password("wrong password", &hash)?);
        Ok(())
    }

    #[test]
    fn test_hashes_are_salted() -> Result<()> {
        let first = hash_password("same password")?;
        let second = hash_password("same password")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn test_access_token_roundtrip() -> Result<()> {
        let settings = test_settings();
        let user = test_user();

        let pair = issue_token_pair(&settings, &user)?;
        let claims = verify_access_token(&settings, &pair.access)?;

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
        assert!(claims.exp > claims.iat);
        Ok(())
    }

    #[test]
    fn test_refresh_token_rejected_as_access() -> Result<()> {
        let settings = test_settings();
        let user = test_user();

        let pair = issue_token_pair(&settings, &user)?;
        assert!(verify_access_token(&settings, &pair.refresh).is_err());
        assert!(verify_refresh_token(&settings, &pair.refresh).is_ok());
        assert!(verify_refresh_token(&settings, &pair.access).is_err());
        Ok(())
    }

    #[test]
    fn test_expired_token_rejected() -> Result<()> {
        let settings = test_settings();
        let user = test_user();

        // Well past the default validation leeway
        let token = encode_token(&settings, &user, TOKEN_TYPE_ACCESS, Duration::minutes(-10))?;
        assert!(verify_access_token(&settings, &token).is_err());
        Ok(())
    }

    #[test]
    fn test_wrong_secret_rejected() -> Result<()> {
        let settings = test_settings();
        let user = test_user();

        let pair = issue_token_pair(&settings, &user)?;
        let other = AuthSettings {
            jwt_secret: "another-secret".to_string(),
            ..test_settings()
        };
        assert!(verify_access_token(&other, &pair.access).is_err());
        Ok(())
    }
}
