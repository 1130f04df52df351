//! Registration and profile endpoints.
//!
//! `POST /user` is open; `GET/PUT/PATCH /api/user` operate on the
//! authenticated account only. The password hash never appears in responses.

use crate::{
    api::{AppState, auth::CurrentUser, validate},
    core::user::{self, NewUser, UserUpdate},
    entities,
    errors::Result,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

/// Body of `POST /user`
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login email, must be unique
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Contact phone number
    pub phone_number: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<()> {
        validate::require_text("first_name", &self.first_name, 50)?;
        validate::require_text("last_name", &self.last_name, 50)?;
        validate::require_email("email", &self.email)?;
        validate::require_password("password", &self.password)?;
        validate::require_text("phone_number", &self.phone_number, 15)?;
        Ok(())
    }
}

/// Body of `PUT /api/user`; every field is required
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login email
    pub email: String,
    /// New plaintext password, omitted to keep the current one
    pub password: Option<String>,
    /// Contact phone number
    pub phone_number: String,
}

/// Body of `PATCH /api/user`; any subset of fields
#[derive(Debug, Default, Deserialize)]
pub struct PatchUserRequest {
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New login email
    pub email: Option<String>,
    /// New plaintext password
    pub password: Option<String>,
    /// New contact phone number
    pub phone_number: Option<String>,
}

impl PatchUserRequest {
    fn validate(&self) -> Result<()> {
        if let Some(first_name) = &self.first_name {
            validate::require_text("first_name", first_name, 50)?;
        }
        if let Some(last_name) = &self.last_name {
            validate::require_text("last_name", last_name, 50)?;
        }
        if let Some(email) = &self.email {
            validate::require_email("email", email)?;
        }
        if let Some(password) = &self.password {
            validate::require_password("password", password)?;
        }
        if let Some(phone_number) = &self.phone_number {
            validate::require_text("phone_number", phone_number, 15)?;
        }
        Ok(())
    }
}

/// `POST /user` - registers a new account, returning it with 201.
///
/// # Errors
/// Returns a validation error for malformed fields or a taken email.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    body.validate()?;

    let created = user::register_user(
        &state.db,
        NewUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
            phone_number: body.phone_number,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/user` - returns the authenticated account.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<entities::user::Model> {
    Json(user)
}

/// `PUT /api/user` - replaces the authenticated account's profile.
///
/// # Errors
/// Returns a validation error for malformed fields or a taken email.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<entities::user::Model>> {
    validate::require_text("first_name", &body.first_name, 50)?;
    validate::require_text("last_name", &body.last_name, 50)?;
    validate::require_email("email", &body.email)?;
    if let Some(password) = &body.password {
        validate::require_password("password", password)?;
    }
    validate::require_text("phone_number", &body.phone_number, 15)?;

    let updated = user::update_user(
        &state.db,
        current.id,
        UserUpdate {
            first_name: Some(body.first_name),
            last_name: Some(body.last_name),
            email: Some(body.email),
            password: body.password,
            phone_number: Some(body.phone_number),
        },
    )
    .await?;

    Ok(Json(updated))
}

/// `PATCH /api/user` - partially updates the authenticated account.
///
/// # Errors
/// Returns a validation error for malformed fields or a taken email.
pub async fn patch_me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(body): Json<PatchUserRequest>,
) -> Result<Json<entities::user::Model>> {
    body.validate()?;

    let updated = user::update_user(
        &state.db,
        current.id,
        UserUpdate {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
            phone_number: body.phone_number,
        },
    )
    .await?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "engine of analysis".to_string(),
            phone_number: "555-0100".to_string(),
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_fields() {
        let mut request = valid_register();
        request.email = "nope".to_string();
        assert!(matches!(
            request.validate(),
            Err(Error::Validation { field, .. }) if field == "email"
        ));

        let mut request = valid_register();
        request.password = "short".to_string();
        assert!(matches!(
            request.validate(),
            Err(Error::Validation { field, .. }) if field == "password"
        ));

        let mut request = valid_register();
        request.first_name = "x".repeat(51);
        assert!(matches!(
            request.validate(),
            Err(Error::Validation { field, .. }) if field == "first_name"
        ));
    }

    #[test]
    fn test_patch_request_skips_absent_fields() {
        assert!(PatchUserRequest::default().validate().is_ok());

        let request = PatchUserRequest {
            phone_number: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
