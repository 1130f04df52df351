//! Product endpoints.
//!
//! Catalog management is open, matching the source system: no token is
//! required to create, search, or update products. Search never exposes
//! soft-deleted products.

use crate::{
    api::{AppState, validate},
    core::product::{self, ProductFilter, ProductUpdate},
    entities,
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

/// Body of `POST /api/product`
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Product name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Unit price
    pub price: Decimal,
}

/// Body of `PUT /api/product`; every field is required
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    /// Product being updated
    pub id: i64,
    /// Product name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Unit price
    pub price: Decimal,
}

/// Body of `PATCH /api/product`; any subset of fields besides `id`
#[derive(Debug, Deserialize)]
pub struct PatchProductRequest {
    /// Product being updated
    pub id: i64,
    /// New product name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New unit price
    pub price: Option<Decimal>,
}

/// Query parameters of `GET /api/product`
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring match on the name
    pub product_name: Option<String>,
    /// Lower price bound, inclusive
    pub minimum_price: Option<Decimal>,
    /// Upper price bound, inclusive
    pub maximum_price: Option<Decimal>,
}

fn validate_product_fields(name: &str, description: Option<&str>, price: Decimal) -> Result<()> {
    validate::require_text("name", name, 100)?;
    if let Some(description) = description {
        validate::max_text("description", description, 100)?;
    }
    validate::require_currency("price", price)?;
    Ok(())
}

/// `POST /api/product` - creates a product, returning it with 201.
///
/// # Errors
/// Returns a validation error for malformed fields.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    validate_product_fields(&body.name, body.description.as_deref(), body.price)?;

    let created =
        product::create_product(&state.db, body.name, body.description, body.price).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/product` - searches non-deleted products by name substring and
/// price bounds.
///
/// Returns 404 with a message body when nothing matches, mirroring the
/// source system's behavior.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Response> {
    let filter = ProductFilter {
        name: query.product_name,
        minimum_price: query.minimum_price,
        maximum_price: query.maximum_price,
    };
    let products = product::search_products(&state.db, &filter).await?;

    if products.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "No products found matching the criteria." })),
        )
            .into_response());
    }
    Ok(Json(products).into_response())
}

/// `PUT /api/product` - replaces a product's fields.
///
/// # Errors
/// Returns `ProductNotFound` or a validation error.
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<entities::product::Model>> {
    validate_product_fields(&body.name, body.description.as_deref(), body.price)?;

    let updated = product::update_product(
        &state.db,
        body.id,
        ProductUpdate {
            name: Some(body.name),
            description: body.description,
            price: Some(body.price),
        },
    )
    .await?;

    Ok(Json(updated))
}

/// `PATCH /api/product` - partially updates a product.
///
/// # Errors
/// Returns `ProductNotFound` or a validation error.
pub async fn patch(
    State(state): State<AppState>,
    Json(body): Json<PatchProductRequest>,
) -> Result<Json<entities::product::Model>> {
    if let Some(name) = &body.name {
        validate::require_text("name", name, 100)?;
    }
    if let Some(description) = &body.description {
        validate::max_text("description", description, 100)?;
    }
    if let Some(price) = body.price {
        validate::require_currency("price", price)?;
    }

    let updated = product::update_product(
        &state.db,
        body.id,
        ProductUpdate {
            name: body.name,
            description: body.description,
            price: body.price,
        },
    )
    .await?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_field_validation() {
        assert!(validate_product_fields("Widget", None, dec!(4.00)).is_ok());
        assert!(validate_product_fields("Widget", Some("A widget"), dec!(4.00)).is_ok());

        assert!(matches!(
            validate_product_fields("", None, dec!(4.00)),
            Err(Error::Validation { field, .. }) if field == "name"
        ));
        assert!(matches!(
            validate_product_fields("Widget", None, dec!(4.005)),
            Err(Error::Validation { field, .. }) if field == "price"
        ));
        let long_description = "x".repeat(101);
        assert!(matches!(
            validate_product_fields("Widget", Some(long_description.as_str()), dec!(4.00)),
            Err(Error::Validation { field, .. }) if field == "description"
        ));
    }
}
