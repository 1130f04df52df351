//! User entity - Represents registered accounts.
//!
//! Each user has identity and contact fields, an opaque public UUID, an Argon2
//! password hash, and active/soft-delete flags. The password hash is never
//! serialized into responses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login email, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// Opaque public identifier, generated at registration
    #[sea_orm(unique)]
    pub user_uuid: Uuid,
    /// Argon2 password hash - write-only, never returned to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Contact phone number
    pub phone_number: String,
    /// Whether the account may authenticate
    pub is_active: bool,
    /// Soft delete flag - if true, account is hidden but data is preserved
    pub is_deleted: bool,
    /// When the user registered
    pub created_at: DateTimeUtc,
    /// When the user was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
