//! Order business logic - Creation, retrieval, item replacement, and total
//! computation.
//!
//! An order's `total_price` is always recomputed from its current item set
//! (quantity x the product's current unit price) immediately after any create
//! or replace of items, never on read. Creation and replacement each run
//! inside one database transaction so the item set and the stored total can
//! never be observed out of step.

use crate::{
    entities::{Order, OrderItem, Product, order, order_item},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// A requested (product, quantity) pair for order creation or replacement
#[derive(Debug, Clone, Copy)]
pub struct OrderItemRequest {
    /// Product being purchased
    pub product_id: i64,
    /// Number of units, positive (validated at the request boundary)
    pub quantity: i32,
}

/// One line of an order as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    /// Product id
    pub product_id: i64,
    /// Product name at read time
    pub product_name: String,
    /// Product description at read time
    pub product_description: Option<String>,
    /// Current unit price of the product
    pub price: Decimal,
    /// Number of units ordered
    pub quantity: i32,
}

/// A full order view: header, lines, and the stored total
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    /// Order id
    pub order_id: i64,
    /// Owning user id
    pub user_id: i64,
    /// Line items with product details
    pub product_details: Vec<OrderItemDetail>,
    /// Stored derived total, None until first computed
    pub total_price: Option<Decimal>,
}

/// Computes the order total as the sum of `quantity x product.price` over the
/// order's current items, using each product's current price.
///
/// Zero items yield a total of zero. Callers run this inside the same
/// transaction that mutated the item set.
///
/// # Errors
/// Returns an error if a referenced product row is missing or a query fails.
pub async fn compute_order_total<C>(conn: &C, order_id: i64) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .find_also_related(Product)
        .all(conn)
        .await?;

    let mut total = Decimal::ZERO;
    for (item, product) in items {
        let product = product.ok_or(Error::ProductNotFound {
            id: item.product_id,
        })?;
        total += product.price * Decimal::from(item.quantity);
    }
    Ok(total)
}

async fn store_order_total<C>(conn: &C, order: order::Model, total: Decimal) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    let mut order: order::ActiveModel = order.into();
    order.total_price = Set(Some(total));
    order.updated_at = Set(chrono::Utc::now());
    order.update(conn).await.map_err(Into::into)
}

/// Creates an order for the given user from a list of (product, quantity)
/// pairs: header first, items after, total computed last, all in one
/// transaction.
///
/// # Errors
/// Returns `ProductNotFound` if any requested product is absent; the whole
/// order is rolled back in that case.
pub async fn create_order(
    db: &DatabaseConnection,
    user_id: i64,
    items: &[OrderItemRequest],
) -> Result<order::Model> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let order = order::ActiveModel {
        user_id: Set(user_id),
        total_price: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for request in items {
        let product = Product::find_by_id(request.product_id)
            .one(&txn)
            .await?
            .ok_or(Error::ProductNotFound {
                id: request.product_id,
            })?;

        order_item::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(request.quantity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let total = compute_order_total(&txn, order.id).await?;
    let order = store_order_total(&txn, order, total).await?;

    txn.commit().await?;
    Ok(order)
}

/// Replaces an order's item set with the requested (product, quantity) list.
///
/// Items whose product appears in the request are quantity-updated in place,
/// preserving row identity; items whose product is absent from the request
/// are deleted; requested products with no existing item are inserted. The
/// resulting set exactly matches the request, and the total is recomputed in
/// the same transaction.
///
/// # Errors
/// Returns `OrderNotFound` or `ProductNotFound`; either aborts the whole
/// replacement, leaving items and total untouched.
pub async fn replace_order_items(
    db: &DatabaseConnection,
    order_id: i64,
    items: &[OrderItemRequest],
) -> Result<order::Model> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    // Every current item starts out marked for deletion; surviving a request
    // match removes it from the set. Keyed by product, which the unique
    // (order, product) index makes a valid key.
    let mut pending_deletion: HashMap<i64, order_item::Model> = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order.id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| (item.product_id, item))
        .collect();

    let mut staged: Vec<order_item::ActiveModel> = Vec::new();
    for request in items {
        let product = Product::find_by_id(request.product_id)
            .one(&txn)
            .await?
            .ok_or(Error::ProductNotFound {
                id: request.product_id,
            })?;

        if let Some(existing) = pending_deletion.remove(&product.id) {
            let mut item: order_item::ActiveModel = existing.into();
            item.quantity = Set(request.quantity);
            item.updated_at = Set(now);
            item.update(&txn).await?;
        } else {
            staged.push(order_item::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(product.id),
                quantity: Set(request.quantity),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
        }
    }

    for leftover in pending_deletion.into_values() {
        leftover.delete(&txn).await?;
    }
    for item in staged {
        item.insert(&txn).await?;
    }

    let total = compute_order_total(&txn, order.id).await?;
    let order = store_order_total(&txn, order, total).await?;

    txn.commit().await?;
    Ok(order)
}

/// Retrieves one order by id, scoped to its owning user.
///
/// # Errors
/// Returns `OrderNotFound` if the order is absent or belongs to another user.
pub async fn get_order_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    order_id: i64,
) -> Result<order::Model> {
    Order::find_by_id(order_id)
        .filter(order::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })
}

/// Retrieves all of a user's orders.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_orders_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Builds the full client view of one order or of all the caller's orders,
/// each with line details and the stored total.
///
/// # Errors
/// Returns `OrderNotFound` when a specific order id is absent or owned by
/// another user.
pub async fn get_order_details(
    db: &DatabaseConnection,
    user_id: i64,
    order_id: Option<i64>,
) -> Result<Vec<OrderDetail>> {
    let orders = match order_id {
        Some(id) => vec![get_order_for_user(db, user_id, id).await?],
        None => get_orders_for_user(db, user_id).await?,
    };

    let mut details = Vec::with_capacity(orders.len());
    for order in orders {
        let items = OrderItem::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .find_also_related(Product)
            .all(db)
            .await?;

        let mut product_details = Vec::with_capacity(items.len());
        for (item, product) in items {
            let product = product.ok_or(Error::ProductNotFound {
                id: item.product_id,
            })?;
            product_details.push(OrderItemDetail {
                product_id: product.id,
                product_name: product.name,
                product_description: product.description,
                price: product.price,
                quantity: item.quantity,
            });
        }

        details.push(OrderDetail {
            order_id: order.id,
            user_id: order.user_id,
            product_details,
            total_price: order.total_price,
        });
    }
    Ok(details)
}
