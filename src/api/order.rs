//! Order endpoints.
//!
//! All routes require a bearer token. Creation and update respond with a
//! message body rather than the full aggregate, mirroring the source system;
//! `GET` returns the full order view with line details and totals.

use crate::{
    api::{AppState, auth::CurrentUser, validate},
    core::order::{self, OrderDetail, OrderItemRequest},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;

/// One requested line in an order body
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderItemPayload {
    /// Product being purchased
    pub product_id: i64,
    /// Number of units
    pub quantity: i32,
}

/// Body of `POST /api/order`
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Requested (product, quantity) lines
    #[serde(default)]
    pub products: Vec<OrderItemPayload>,
}

/// Body of `PUT /api/order`
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    /// Order whose item set is being replaced
    pub order_id: i64,
    /// The complete new (product, quantity) list
    #[serde(default)]
    pub products: Vec<OrderItemPayload>,
}

/// Query parameters of `GET /api/order`
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    /// Restrict to one order
    pub order_id: Option<i64>,
}

// Each quantity must be positive and a product may appear at most once; the
// storage layer's unique (order, product) index would reject duplicates
// anyway, but here they surface as a field error instead of a 500.
fn validate_items(items: &[OrderItemPayload]) -> Result<Vec<OrderItemRequest>> {
    let mut seen = HashSet::new();
    let mut requests = Vec::with_capacity(items.len());
    for item in items {
        validate::require_positive_quantity("quantity", item.quantity)?;
        if !seen.insert(item.product_id) {
            return Err(Error::validation(
                "products",
                "A product may appear at most once per order.",
            ));
        }
        requests.push(OrderItemRequest {
            product_id: item.product_id,
            quantity: item.quantity,
        });
    }
    Ok(requests)
}

/// `POST /api/order` - creates an order for the caller.
///
/// # Errors
/// Returns `ProductNotFound` if any requested product is absent, or a
/// validation error for malformed lines.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse> {
    let items = validate_items(&body.products)?;

    order::create_order(&state.db, user.id, &items).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order created successfully" })),
    ))
}

/// `GET /api/order` - returns one order or all of the caller's orders, with
/// line details and totals.
///
/// # Errors
/// Returns `OrderNotFound` when a requested order is absent or owned by
/// another user.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<OrderDetail>>> {
    let details = order::get_order_details(&state.db, user.id, query.order_id).await?;
    Ok(Json(details))
}

/// `PUT /api/order` - replaces an order's item set with the requested list.
///
/// # Errors
/// Returns `OrderNotFound` or `ProductNotFound`; either leaves the order
/// untouched.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<serde_json::Value>> {
    let items = validate_items(&body.products)?;

    order::replace_order_items(&state.db, body.order_id, &items).await?;

    Ok(Json(json!({ "message": "Order updated successfully" })))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_validate_items_accepts_distinct_lines() {
        let items = [
            OrderItemPayload {
                product_id: 1,
                quantity: 2,
            },
            OrderItemPayload {
                product_id: 2,
                quantity: 1,
            },
        ];
        let requests = validate_items(&items).unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn test_validate_items_rejects_non_positive_quantity() {
        let items = [OrderItemPayload {
            product_id: 1,
            quantity: 0,
        }];
        assert!(matches!(
            validate_items(&items),
            Err(Error::Validation { field, .. }) if field == "quantity"
        ));
    }

    #[test]
    fn test_validate_items_rejects_duplicate_products() {
        let items = [
            OrderItemPayload {
                product_id: 1,
                quantity: 2,
            },
            OrderItemPayload {
                product_id: 1,
                quantity: 3,
            },
        ];
        assert!(matches!(
            validate_items(&items),
            Err(Error::Validation { field, .. }) if field == "products"
        ));
    }
}
