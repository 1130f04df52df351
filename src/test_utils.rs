//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{order, product, user},
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with sensible defaults and the given email.
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    user::register_user(
        db,
        user::NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: "correct horse battery staple".to_string(),
            phone_number: "555-0100".to_string(),
        },
    )
    .await
}

/// Creates a test product with the given name and price.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
) -> Result<entities::product::Model> {
    product::create_product(db, name.to_string(), None, price).await
}

/// Creates a test order for the given user from (`product_id`, quantity)
/// pairs.
pub async fn create_test_order(
    db: &DatabaseConnection,
    user_id: i64,
    items: &[(i64, i32)],
) -> Result<entities::order::Model> {
    let requests: Vec<order::OrderItemRequest> = items
        .iter()
        .map(|&(product_id, quantity)| order::OrderItemRequest {
            product_id,
            quantity,
        })
        .collect();
    order::create_order(db, user_id, &requests).await
}

/// Sets up a complete test environment with a registered user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "test@example.com").await?;
    Ok((db, user))
}

/// Sets up a test environment with a user and two products priced 10.00 and
/// 5.50. Returns (db, user, `product_a`, `product_b`) for order and payment
/// tests.
pub async fn setup_with_products() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::product::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "test@example.com").await?;
    let product_a = create_test_product(&db, "Product A", dec!(10.00)).await?;
    let product_b = create_test_product(&db, "Product B", dec!(5.50)).await?;
    Ok((db, user, product_a, product_b))
}
