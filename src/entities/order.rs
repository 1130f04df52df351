//! Order entity - A user's collection of purchased line items.
//!
//! Each order belongs to one user (immutable after creation) and owns a set of
//! order items plus at most one payment, both cascade-deleted with the order.
//! `total_price` is derived from the items and stays NULL until first computed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who placed the order
    pub user_id: i64,
    /// Sum of quantity x unit price over current items, two decimal places
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub total_price: Option<Decimal>,
    /// When the order was created
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One order has many order items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
    /// One order has at most one payment
    #[sea_orm(has_one = "super::payment::Entity")]
    Payment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
