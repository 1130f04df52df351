//! Payment entity - A single settlement attempt tied one-to-one to an order.
//!
//! The `order_id` column is unique so the store itself rejects a second payment
//! row for the same order. Status is derived by comparing the submitted amount
//! to the order's stored total; Completed payments are immutable.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accepted payment methods
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Credit or debit card
    #[sea_orm(string_value = "credit-card")]
    CreditCard,
    /// Bank wire transfer
    #[sea_orm(string_value = "wire-transfer")]
    WireTransfer,
    /// Net banking
    #[sea_orm(string_value = "net-banking")]
    NetBanking,
    /// Unified Payments Interface
    #[sea_orm(string_value = "upi")]
    Upi,
}

/// Settlement status of a payment attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    /// Recorded but not yet resolved
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Amount matched the order total; terminal
    #[sea_orm(string_value = "Completed")]
    Completed,
    /// Amount mismatched; a corrected retry may still complete
    #[sea_orm(string_value = "Failed")]
    Failed,
}

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the order being settled, unique - one payment per order
    #[sea_orm(unique)]
    pub order_id: i64,
    /// How the payment was made
    pub payment_method: PaymentMethod,
    /// System-generated opaque transaction identifier
    #[sea_orm(unique)]
    pub transaction_id: Uuid,
    /// Amount submitted by the payer, two decimal places
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_paid: Decimal,
    /// Settlement status derived from the amount comparison
    pub status: PaymentStatus,
    /// When the payment row was created
    pub created_at: DateTimeUtc,
    /// When the payment was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment settles exactly one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
