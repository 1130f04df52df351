//! Unified error types and result handling.
//!
//! Every failure the backend can surface is a variant here, and each variant
//! maps to exactly one HTTP status at the API boundary. Nothing is retried
//! internally and no partial success is ever reported as success.

use crate::entities::PaymentStatus;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Unified error type for the whole backend
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("User not found: {identifier}")]
    UserNotFound { identifier: String },

    #[error("One or more products do not exist")]
    ProductNotFound { id: i64 },

    #[error("Order not found")]
    OrderNotFound { id: i64 },

    #[error("Payment not found")]
    PaymentNotFound { order_id: i64 },

    #[error("Payment already exists for the order")]
    PaymentAlreadyExists {
        order_id: i64,
        status: PaymentStatus,
    },

    #[error("Payment already completed")]
    PaymentAlreadyCompleted { order_id: i64 },

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required: {message}")]
    Unauthorized { message: String },

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {message}")]
    PasswordHash { message: String },
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Error::PasswordHash {
            message: value.to_string(),
        }
    }
}

impl Error {
    /// Shorthand for a field-level validation failure.
    pub fn validation(field: &str, message: &str) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// The HTTP status this error surfaces as.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UserNotFound { .. }
            | Self::ProductNotFound { .. }
            | Self::OrderNotFound { .. }
            | Self::PaymentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::PaymentAlreadyExists { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::PaymentAlreadyCompleted { .. } => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthorized { .. } | Self::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::PasswordHash { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("internal error: {self}");
        }

        let body = match &self {
            Self::Validation { field, message } => {
                let mut fields = serde_json::Map::new();
                fields.insert(field.clone(), json!(message));
                json!({ "errors": fields })
            }
            Self::PaymentAlreadyExists { status, .. } => json!({
                "error": self.to_string(),
                "payment_status": status,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::OrderNotFound { id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::PaymentAlreadyExists {
                order_id: 1,
                status: PaymentStatus::Failed
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::PaymentAlreadyCompleted { order_id: 1 }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::validation("email", "required").status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
