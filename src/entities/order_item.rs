//! Order item entity - A (product, quantity) line within an order.
//!
//! At most one row may exist per (order, product) pair; a composite unique
//! index created at schema setup enforces this at the storage layer rather
//! than relying on the replacement logic alone.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    /// Unique identifier for the order item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the order this line belongs to
    pub order_id: i64,
    /// ID of the product being purchased
    pub product_id: i64,
    /// Number of units, always positive
    pub quantity: i32,
    /// When the item was created
    pub created_at: DateTimeUtc,
    /// When the item was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between OrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order item belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
    /// Each order item references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
