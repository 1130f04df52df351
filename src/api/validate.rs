//! Field-level request validation helpers.
//!
//! These enforce the serializer-layer constraints (required-ness, max
//! lengths, email shape, decimal precision) before any business logic runs,
//! so the core modules may assume well-formed input.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Rejects blank values and values longer than `max_length`.
///
/// # Errors
/// Returns a field-level validation error on violation.
pub fn require_text(field: &str, value: &str, max_length: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "This field may not be blank."));
    }
    max_text(field, value, max_length)
}

/// Rejects values longer than `max_length`; blank is allowed.
///
/// # Errors
/// Returns a field-level validation error on violation.
pub fn max_text(field: &str, value: &str, max_length: usize) -> Result<()> {
    if value.chars().count() > max_length {
        return Err(Error::Validation {
            field: field.to_string(),
            message: format!("Ensure this field has no more than {max_length} characters."),
        });
    }
    Ok(())
}

/// Minimal email shape check; full deliverability is not this layer's job.
///
/// # Errors
/// Returns a field-level validation error on violation.
pub fn require_email(field: &str, value: &str) -> Result<()> {
    require_text(field, value, 254)?;
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(Error::validation(field, "Enter a valid email address."));
    }
    Ok(())
}

/// Enforces the minimum password length.
///
/// # Errors
/// Returns a field-level validation error on violation.
pub fn require_password(field: &str, value: &str) -> Result<()> {
    if value.chars().count() < 8 {
        return Err(Error::validation(
            field,
            "This password is too short. It must contain at least 8 characters.",
        ));
    }
    Ok(())
}

/// Enforces the currency shape: at most 10 digits in total, at most 2 of
/// them fractional.
///
/// # Errors
/// Returns a field-level validation error on violation.
pub fn require_currency(field: &str, value: Decimal) -> Result<()> {
    if value.scale() > 2 {
        return Err(Error::validation(
            field,
            "Ensure that there are no more than 2 decimal places.",
        ));
    }
    if value.abs() >= Decimal::from(100_000_000) {
        return Err(Error::validation(
            field,
            "Ensure that there are no more than 10 digits in total.",
        ));
    }
    Ok(())
}

/// Enforces a positive line quantity.
///
/// # Errors
/// Returns a field-level validation error on violation.
pub fn require_positive_quantity(field: &str, value: i32) -> Result<()> {
    if value < 1 {
        return Err(Error::validation(
            field,
            "Quantity must be a positive integer.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_require_text() {
        assert!(require_text("name", "ok", 10).is_ok());
        assert!(require_text("name", "   ", 10).is_err());
        assert!(require_text("name", "toolongvalue", 5).is_err());
    }

    #[test]
    fn test_require_email() {
        assert!(require_email("email", "ada@example.com").is_ok());
        assert!(require_email("email", "not-an-email").is_err());
        assert!(require_email("email", "@example.com").is_err());
        assert!(require_email("email", "ada@nodot").is_err());
    }

    #[test]
    fn test_require_password() {
        assert!(require_password("password", "long enough").is_ok());
        assert!(require_password("password", "short").is_err());
    }

    #[test]
    fn test_require_currency() {
        assert!(require_currency("price", dec!(25.50)).is_ok());
        assert!(require_currency("price", dec!(25.505)).is_err());
        assert!(require_currency("price", dec!(123456789.00)).is_err());
    }

    #[test]
    fn test_require_positive_quantity() {
        assert!(require_positive_quantity("quantity", 1).is_ok());
        assert!(require_positive_quantity("quantity", 0).is_err());
        assert!(require_positive_quantity("quantity", -3).is_err());
    }
}
