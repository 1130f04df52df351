//! HTTP API layer - axum router, shared state, and resource handlers.
//!
//! Handlers are thin: they validate the request shape, resolve the bearer
//! token to a principal where the route requires one, call into [`crate::core`]
//! with explicit parameters, and translate the outcome to a status/JSON pair.

/// Token endpoints and the bearer-token extractor
pub mod auth;
/// Order endpoints
pub mod order;
/// Payment endpoints
pub mod payment;
/// Product endpoints
pub mod product;
/// Registration and profile endpoints
pub mod user;
/// Field-level request validation helpers
pub mod validate;

use crate::config::settings::Settings;
use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub db: DatabaseConnection,
    /// Application settings, including token signing configuration
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and
    /// settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Arc<Settings>) -> Self {
        Self { db, settings }
    }
}

/// Builds the application router with every endpoint mounted.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user", post(user::register))
        .route("/api/token", post(auth::obtain_token_pair))
        .route("/api/token/refresh", post(auth::refresh_token_pair))
        .route(
            "/api/user",
            get(user::me).put(user::update_me).patch(user::patch_me),
        )
        .route(
            "/api/product",
            post(product::create)
                .get(product::search)
                .put(product::update)
                .patch(product::patch),
        )
        .route(
            "/api/order",
            post(order::create).get(order::list).put(order::update),
        )
        .route(
            "/api/payment",
            post(payment::create).get(payment::list).put(payment::update),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
