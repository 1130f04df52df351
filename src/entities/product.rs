//! Product entity - Represents catalog items with fixed prices.
//!
//! Each product has a name, optional description, and a fixed-point price with
//! two fractional digits. Products are never hard-deleted; the soft-delete flag
//! hides them from catalog queries while order history keeps referencing them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Coffee Beans 1kg")
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Unit price, two decimal places
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    /// Soft delete flag - if true, product is hidden but data is preserved
    pub is_deleted: bool,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product appears in many order items
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
