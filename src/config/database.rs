//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Table statements are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the database schema matches the Rust
//! struct definitions without manual SQL. On top of the generated tables it
//! creates a composite unique index so the store itself guarantees at most one
//! order-item row per (order, product) pair.

use crate::entities::{Order, OrderItem, Payment, Product, User, order_item};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/shop_ease.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database using the `DATABASE_URL`
/// environment variable, falling back to a local `SQLite` file.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all database tables and indexes from the entity definitions.
///
/// Idempotent: every statement carries `IF NOT EXISTS`, so this can run on
/// every startup.
///
/// # Errors
/// Returns an error if any schema statement fails to execute.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut product_table = schema.create_table_from_entity(Product);
    let mut order_table = schema.create_table_from_entity(Order);
    let mut order_item_table = schema.create_table_from_entity(OrderItem);
    let mut payment_table = schema.create_table_from_entity(Payment);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(product_table.if_not_exists()))
        .await?;
    db.execute(builder.build(order_table.if_not_exists())).await?;
    db.execute(builder.build(order_item_table.if_not_exists()))
        .await?;
    db.execute(builder.build(payment_table.if_not_exists()))
        .await?;

    // At most one item row per (order, product) pair
    let order_product_unique = Index::create()
        .name("idx_order_items_order_product")
        .table(OrderItem)
        .col(order_item::Column::OrderId)
        .col(order_item::Column::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&order_product_unique)).await?;

    Ok(())
}
