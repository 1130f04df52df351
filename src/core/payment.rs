//! Payment business logic - The amount-matching settlement state machine.
//!
//! A payment settles Completed exactly when the submitted amount equals the
//! order's stored total (exact fixed-point comparison, no tolerance band);
//! any other amount records as Failed, keeping the method and amount so a
//! corrected retry can be submitted. Completed is terminal: no further
//! mutation is accepted. Creation and update each run in one transaction and
//! never touch anything beyond the payment row itself.

use crate::{
    entities::{Order, Payment, PaymentMethod, PaymentStatus, order, payment},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{JoinType, QuerySelect, Set, TransactionTrait, prelude::*};

// Completed iff the submitted amount equals the stored total. An order whose
// total was never computed can never settle.
fn settle(total_price: Option<Decimal>, amount_paid: Decimal) -> PaymentStatus {
    match total_price {
        Some(total) if total == amount_paid => PaymentStatus::Completed,
        _ => PaymentStatus::Failed,
    }
}

/// Creates the payment for an order, deriving its status from the amount
/// comparison.
///
/// The payment row is persisted whether it settles Completed or Failed, with
/// a fresh opaque transaction identifier either way.
///
/// # Errors
/// Returns `OrderNotFound` if the order is absent, or `PaymentAlreadyExists`
/// (carrying the existing status) if the order already has a payment; no
/// second row is ever created.
pub async fn create_payment(
    db: &DatabaseConnection,
    order_id: i64,
    payment_method: PaymentMethod,
    amount_paid: Decimal,
) -> Result<payment::Model> {
    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if let Some(existing) = Payment::find()
        .filter(payment::Column::OrderId.eq(order.id))
        .one(&txn)
        .await?
    {
        return Err(Error::PaymentAlreadyExists {
            order_id,
            status: existing.status,
        });
    }

    let now = chrono::Utc::now();
    let payment = payment::ActiveModel {
        order_id: Set(order.id),
        payment_method: Set(payment_method),
        transaction_id: Set(Uuid::new_v4()),
        amount_paid: Set(amount_paid),
        status: Set(settle(order.total_price, amount_paid)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(payment)
}

/// Re-submits an order's payment, overwriting method and amount and
/// re-deriving the status by the same equality rule.
///
/// Failed is non-terminal: a corrected retry may complete. Completed is
/// frozen and rejects any further mutation.
///
/// # Errors
/// Returns `OrderNotFound` if the order is absent, `PaymentNotFound` if no
/// payment row exists yet, or `PaymentAlreadyCompleted` if the stored status
/// is Completed (the row is left untouched).
pub async fn update_payment(
    db: &DatabaseConnection,
    order_id: i64,
    payment_method: PaymentMethod,
    amount_paid: Decimal,
) -> Result<payment::Model> {
    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let existing = Payment::find()
        .filter(payment::Column::OrderId.eq(order.id))
        .one(&txn)
        .await?
        .ok_or(Error::PaymentNotFound { order_id })?;

    if existing.status == PaymentStatus::Completed {
        return Err(Error::PaymentAlreadyCompleted { order_id });
    }

    let mut payment: payment::ActiveModel = existing.into();
    payment.payment_method = Set(payment_method);
    payment.amount_paid = Set(amount_paid);
    payment.status = Set(settle(order.total_price, amount_paid));
    payment.updated_at = Set(chrono::Utc::now());
    let payment = payment.update(&txn).await?;

    txn.commit().await?;
    Ok(payment)
}

/// Retrieves the payment for one order, scoped to the order's owning user.
///
/// # Errors
/// Returns `OrderNotFound` if the order is absent or owned by another user,
/// or `PaymentNotFound` if the order has no payment.
pub async fn get_payment_for_order(
    db: &DatabaseConnection,
    user_id: i64,
    order_id: i64,
) -> Result<payment::Model> {
    let order = Order::find_by_id(order_id)
        .filter(order::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    Payment::find()
        .filter(payment::Column::OrderId.eq(order.id))
        .one(db)
        .await?
        .ok_or(Error::PaymentNotFound { order_id })
}

/// Retrieves all payments across a user's orders.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_payments_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .join(JoinType::InnerJoin, payment::Relation::Order.def())
        .filter(order::Column::UserId.eq(user_id))
        .all(db)
        .await
        .map_err(Into::into)
}
