//! Payment endpoints.
//!
//! Creation and update both run the settlement rule; a Failed settlement
//! persists the attempt but surfaces as 400 with the mismatch message, so a
//! client can correct the amount and retry via `PUT`.

use crate::{
    api::{AppState, auth::CurrentUser, validate},
    core::payment,
    entities::{PaymentMethod, PaymentStatus, payment as payment_entity},
    errors::Result,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

/// Body of `POST /api/payment` and `PUT /api/payment`
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Order being settled
    pub order_id: i64,
    /// How the payment is made
    pub payment_method: PaymentMethod,
    /// Amount submitted by the payer
    pub amount_paid: Decimal,
}

/// Query parameters of `GET /api/payment`
#[derive(Debug, Default, Deserialize)]
pub struct PaymentQuery {
    /// Restrict to one order's payment
    pub order_id: Option<i64>,
}

const AMOUNT_MISMATCH: &str = "Amount paid does not match total amount. Payment failed.";

/// `POST /api/payment` - creates the payment for an order.
///
/// A matching amount settles Completed and returns 201; a mismatch persists
/// the Failed attempt and returns 400.
///
/// # Errors
/// Returns `OrderNotFound`, `PaymentAlreadyExists`, or a validation error.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(body): Json<PaymentRequest>,
) -> Result<Response> {
    validate::require_currency("amount_paid", body.amount_paid)?;

    let created = payment::create_payment(
        &state.db,
        body.order_id,
        body.payment_method,
        body.amount_paid,
    )
    .await?;

    let response = if created.status == PaymentStatus::Completed {
        (
            StatusCode::CREATED,
            Json(json!({ "message": "Payment successful" })),
        )
            .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": AMOUNT_MISMATCH })),
        )
            .into_response()
    };
    Ok(response)
}

/// `GET /api/payment` - returns one order's payment or all payments across
/// the caller's orders.
///
/// # Errors
/// Returns `OrderNotFound` or `PaymentNotFound` for a specific order id.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PaymentQuery>,
) -> Result<Response> {
    let response = match query.order_id {
        Some(order_id) => {
            let found = payment::get_payment_for_order(&state.db, user.id, order_id).await?;
            Json(found).into_response()
        }
        None => {
            let found: Vec<payment_entity::Model> =
                payment::get_payments_for_user(&state.db, user.id).await?;
            Json(found).into_response()
        }
    };
    Ok(response)
}

/// `PUT /api/payment` - re-submits an order's payment.
///
/// A matching amount settles Completed and returns the payment; a mismatch
/// records the Failed attempt and returns 400.
///
/// # Errors
/// Returns `OrderNotFound`, `PaymentNotFound`, `PaymentAlreadyCompleted`, or
/// a validation error.
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(body): Json<PaymentRequest>,
) -> Result<Response> {
    validate::require_currency("amount_paid", body.amount_paid)?;

    let updated = payment::update_payment(
        &state.db,
        body.order_id,
        body.payment_method,
        body.amount_paid,
    )
    .await?;

    let response = if updated.status == PaymentStatus::Completed {
        Json(updated).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": AMOUNT_MISMATCH })),
        )
            .into_response()
    };
    Ok(response)
}
