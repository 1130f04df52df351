//! Catalog business logic - Handles all product-related operations.
//!
//! Products are never hard-deleted: the soft-delete flag hides them from
//! catalog queries while existing order items keep referencing them. Prices
//! are fixed-point decimals with two fractional digits.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Catalog search criteria; `None` fields are not filtered on
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name
    pub name: Option<String>,
    /// Lower price bound, inclusive
    pub minimum_price: Option<Decimal>,
    /// Upper price bound, inclusive
    pub maximum_price: Option<Decimal>,
}

/// Field changes for a product update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    /// New product name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New unit price
    pub price: Option<Decimal>,
}

/// Retrieves all non-deleted products matching the filter, ordered
/// alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn search_products(
    db: &DatabaseConnection,
    filter: &ProductFilter,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find().filter(product::Column::IsDeleted.eq(false));
    if let Some(name) = &filter.name {
        query = query.filter(product::Column::Name.contains(name));
    }
    if let Some(minimum) = filter.minimum_price {
        query = query.filter(product::Column::Price.gte(minimum));
    }
    if let Some(maximum) = filter.maximum_price {
        query = query.filter(product::Column::Price.lte(maximum));
    }
    query
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID, deleted or not.
///
/// Order history references soft-deleted products, so this lookup does not
/// filter on the deletion flag.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new catalog product.
///
/// # Errors
/// Returns an error if the name is empty, the price is negative, or the
/// insert fails.
pub async fn create_product(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
    price: Decimal,
) -> Result<product::Model> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "Product name cannot be empty"));
    }
    if price.is_sign_negative() {
        return Err(Error::validation("price", "Price cannot be negative"));
    }

    let now = chrono::Utc::now();
    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        price: Set(price),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Applies a full or partial update to an existing product.
///
/// # Errors
/// Returns an error if the product is absent, a new value fails validation,
/// or the update fails.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    changes: ProductUpdate,
) -> Result<product::Model> {
    let existing = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if let Some(name) = &changes.name {
        if name.trim().is_empty() {
            return Err(Error::validation("name", "Product name cannot be empty"));
        }
    }
    if let Some(price) = changes.price {
        if price.is_sign_negative() {
            return Err(Error::validation("price", "Price cannot be negative"));
        }
    }

    let mut product: product::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        product.name = Set(name.trim().to_string());
    }
    if let Some(description) = changes.description {
        product.description = Set(Some(description));
    }
    if let Some(price) = changes.price {
        product.price = Set(price);
    }
    product.updated_at = Set(chrono::Utc::now());

    product.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(&db, String::new(), None, dec!(1.00)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_product(&db, "Widget".to_string(), None, dec!(-1.00)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_trims_name() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(
            &db,
            "  Coffee Beans  ".to_string(),
            Some("1kg bag".to_string()),
            dec!(12.50),
        )
        .await?;

        assert_eq!(product.name, "Coffee Beans");
        assert_eq!(product.description.as_deref(), Some("1kg bag"));
        assert_eq!(product.price, dec!(12.50));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_by_name_substring() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Coffee Beans", dec!(12.50)).await?;
        create_test_product(&db, "Coffee Mug", dec!(8.00)).await?;
        create_test_product(&db, "Tea Pot", dec!(20.00)).await?;

        let filter = ProductFilter {
            name: Some("coffee".to_string()),
            ..Default::default()
        };
        let found = search_products(&db, &filter).await?;

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Coffee Beans");
        assert_eq!(found[1].name, "Coffee Mug");
        Ok(())
    }

    #[tokio::test]
    async fn test_search_by_price_range() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Cheap", dec!(5.00)).await?;
        create_test_product(&db, "Middle", dec!(10.00)).await?;
        create_test_product(&db, "Expensive", dec!(50.00)).await?;

        let filter = ProductFilter {
            minimum_price: Some(dec!(6.00)),
            maximum_price: Some(dec!(20.00)),
            ..Default::default()
        };
        let found = search_products(&db, &filter).await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Middle");

        // Bounds are inclusive
        let filter = ProductFilter {
            minimum_price: Some(dec!(5.00)),
            maximum_price: Some(dec!(10.00)),
            ..Default::default()
        };
        assert_eq!(search_products(&db, &filter).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_hides_deleted_products() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Hidden", dec!(5.00)).await?;

        let mut active: product::ActiveModel = product.clone().into();
        active.is_deleted = Set(true);
        active.update(&db).await?;

        let found = search_products(&db, &ProductFilter::default()).await?;
        assert!(found.is_empty());

        // Direct id lookup still resolves for order history
        assert!(get_product_by_id(&db, product.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Widget", dec!(4.00)).await?;

        let updated = update_product(
            &db,
            product.id,
            ProductUpdate {
                price: Some(dec!(4.50)),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.price, dec!(4.50));
        assert_eq!(updated.name, "Widget");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_product(&db, 999, ProductUpdate::default()).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 999 })));
        Ok(())
    }
}
