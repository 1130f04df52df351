//! Account business logic - Handles registration and profile management.
//!
//! Passwords are hashed with Argon2 before they ever reach the store, and a
//! duplicate-email pre-check backs up the unique column constraint so the
//! failure surfaces as a field-level validation error rather than a raw
//! database error.

use crate::{
    auth,
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Input for registering a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login email, must be unique
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Contact phone number
    pub phone_number: String,
}

/// Field changes for a profile update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
    /// New login email, must stay unique
    pub email: Option<String>,
    /// New plaintext password, re-hashed before storage
    pub password: Option<String>,
    /// New contact phone number
    pub phone_number: Option<String>,
}

/// Registers a new account.
///
/// Generates the opaque public UUID, hashes the password, and rejects emails
/// that are already registered.
///
/// # Errors
/// Returns an error if the email is taken, hashing fails, or the insert fails.
pub async fn register_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    if find_by_email(db, &new_user.email).await?.is_some() {
        return Err(Error::validation(
            "email",
            "A user with this email already exists",
        ));
    }

    let now = chrono::Utc::now();
    let password_hash = auth::hash_password(&new_user.password)?;

    let user = user::ActiveModel {
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        email: Set(new_user.email),
        user_uuid: Set(Uuid::new_v4()),
        password_hash: Set(password_hash),
        phone_number: Set(new_user.phone_number),
        is_active: Set(true),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    user.insert(db).await.map_err(Into::into)
}

/// Finds an account by login email, returning None if absent or soft-deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .filter(user::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an account by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

// Email lookup without the soft-delete filter; uniqueness must hold across
// deleted accounts too.
async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies a full or partial profile update to an existing account.
///
/// An email change re-checks uniqueness; a password change re-hashes.
///
/// # Errors
/// Returns an error if the user is absent, the new email is taken, hashing
/// fails, or the update fails.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    changes: UserUpdate,
) -> Result<user::Model> {
    let existing = get_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            identifier: user_id.to_string(),
        })?;

    if let Some(new_email) = &changes.email {
        if *new_email != existing.email && find_by_email(db, new_email).await?.is_some() {
            return Err(Error::validation(
                "email",
                "A user with this email already exists",
            ));
        }
    }

    let mut user: user::ActiveModel = existing.into();
    if let Some(first_name) = changes.first_name {
        user.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        user.last_name = Set(last_name);
    }
    if let Some(email) = changes.email {
        user.email = Set(email);
    }
    if let Some(password) = changes.password {
        user.password_hash = Set(auth::hash_password(&password)?);
    }
    if let Some(phone_number) = changes.phone_number {
        user.phone_number = Set(phone_number);
    }
    user.updated_at = Set(chrono::Utc::now());

    user.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_user_hashes_password() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(
            &db,
            NewUser {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "engine of analysis".to_string(),
                phone_number: "555-0100".to_string(),
            },
        )
        .await?;

        assert_ne!(user.password_hash, "engine of analysis");
        assert!(auth::verify_password(
            "engine of analysis",
            &user.password_hash
        )?);
        assert!(user.is_active);
        assert!(!user.is_deleted);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_rejected() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let result = register_user(
            &db,
            NewUser {
                first_name: "Other".to_string(),
                last_name: "Person".to_string(),
                email: user.email.clone(),
                password: "another password".to_string(),
                phone_number: "555-0199".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_by_email() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let found = get_user_by_email(&db, &user.email).await?;
        assert_eq!(found, Some(user));

        let missing = get_user_by_email(&db, "nobody@example.com").await?;
        assert!(missing.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_partial() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let updated = update_user(
            &db,
            user.id,
            UserUpdate {
                phone_number: Some("555-0123".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.phone_number, "555-0123");
        assert_eq!(updated.first_name, user.first_name);
        assert_eq!(updated.email, user.email);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() -> Result<()> {
        let (db, user) = setup_with_user().await?;

        let updated = update_user(
            &db,
            user.id,
            UserUpdate {
                password: Some("brand new password".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert!(auth::verify_password(
            "brand new password",
            &updated.password_hash
        )?);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_email_conflict() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let other = create_test_user(&db, "other@example.com").await?;

        let result = update_user(
            &db,
            other.id,
            UserUpdate {
                email: Some(user.email),
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_user() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_user(&db, 999, UserUpdate::default()).await;
        assert!(matches!(result, Err(Error::UserNotFound { .. })));
        Ok(())
    }
}
