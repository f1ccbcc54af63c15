//! Catalog business logic - Products and their SKU-level variants.
//!
//! Besides plain creation and lookup, this module owns [`VariantUpdate`], the partial update
//! used by both the inventory importer and the purchase order engine. Only the fields that
//! are present end up in the write set, and stock is always adjusted with a single
//! `stock = stock + delta` statement so concurrent restocks cannot lose updates.

use crate::{
    core::current_timestamp,
    entities::{Product, ProductVariant, product, product_variant},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use tracing::{debug, instrument};

/// Input for [`create_product`].
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    /// Display title, must not be blank
    pub title: String,
    /// Base price in minor units
    pub base_price: i64,
    /// Category reference
    pub category_id: Option<i64>,
    /// Brand reference
    pub brand_id: Option<i64>,
    /// Static listing discount percentage
    pub discount_percent: f64,
    /// Thumbnail path or URL
    pub thumbnail: Option<String>,
    /// Target gender
    pub gender: Option<String>,
    /// Material description
    pub material: Option<String>,
}

/// Input for [`create_variant`].
#[derive(Debug, Clone, Default)]
pub struct NewVariant {
    /// Parent product
    pub product_id: i64,
    /// SKU, unique within the product
    pub sku: String,
    /// Size label
    pub size: Option<String>,
    /// Color label
    pub color: Option<String>,
    /// Price override in minor units
    pub price: Option<i64>,
    /// Cost price in minor units
    pub cost_price: Option<i64>,
    /// Initial stock
    pub stock: i32,
}

/// Partial update of a variant. `None` fields are left untouched; `stock_delta` is added
/// to the current stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantUpdate {
    /// New size label
    pub size: Option<String>,
    /// New color label
    pub color: Option<String>,
    /// New price override
    pub price: Option<i64>,
    /// New cost price
    pub cost_price: Option<i64>,
    /// Units to add to stock
    pub stock_delta: i32,
}

impl VariantUpdate {
    /// Returns true when applying the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size.is_none()
            && self.color.is_none()
            && self.price.is_none()
            && self.cost_price.is_none()
            && self.stock_delta == 0
    }
}

fn non_negative_price(value: Option<i64>, field: &str) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(Error::InvalidPrice {
            message: format!("{field} cannot be negative ({v})"),
        }),
        _ => Ok(()),
    }
}

/// Creates a product after validating its title and prices.
///
/// # Errors
/// Returns an error if:
/// - The title is empty or whitespace-only
/// - The base price is negative
/// - The static discount is not a finite percentage between 0 and 100
/// - The database insert fails
pub async fn create_product<C>(db: &C, input: NewProduct) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    if input.title.trim().is_empty() {
        return Err(Error::invalid_input("Product title cannot be empty"));
    }
    non_negative_price(Some(input.base_price), "base price")?;
    if !input.discount_percent.is_finite() || !(0.0..=100.0).contains(&input.discount_percent) {
        return Err(Error::invalid_input(format!(
            "Discount percent must be between 0 and 100, got {}",
            input.discount_percent
        )));
    }

    let product = product::ActiveModel {
        category_id: Set(input.category_id),
        brand_id: Set(input.brand_id),
        title: Set(input.title.trim().to_string()),
        base_price: Set(input.base_price),
        discount_percent: Set(input.discount_percent),
        thumbnail: Set(input.thumbnail),
        gender: Set(input.gender),
        material: Set(input.material),
        created_at: Set(current_timestamp()),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Retrieves a product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a variant by its unique ID.
pub async fn get_variant_by_id<C>(
    db: &C,
    variant_id: i64,
) -> Result<Option<product_variant::Model>>
where
    C: ConnectionTrait,
{
    ProductVariant::find_by_id(variant_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the variant of `product_id` carrying `sku`.
pub async fn find_variant_by_sku<C>(
    db: &C,
    product_id: i64,
    sku: &str,
) -> Result<Option<product_variant::Model>>
where
    C: ConnectionTrait,
{
    ProductVariant::find()
        .filter(product_variant::Column::ProductId.eq(product_id))
        .filter(product_variant::Column::Sku.eq(sku))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists the variants of a product in creation order.
pub async fn list_variants_for_product<C>(
    db: &C,
    product_id: i64,
) -> Result<Vec<product_variant::Model>>
where
    C: ConnectionTrait,
{
    ProductVariant::find()
        .filter(product_variant::Column::ProductId.eq(product_id))
        .order_by_asc(product_variant::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a variant under an existing product.
///
/// # Errors
/// Returns an error if:
/// - The SKU is blank, or already used by another variant of the same product
/// - The stock or a price is negative
/// - The product does not exist
pub async fn create_variant<C>(db: &C, input: NewVariant) -> Result<product_variant::Model>
where
    C: ConnectionTrait,
{
    let sku = input.sku.trim().to_string();
    if sku.is_empty() {
        return Err(Error::invalid_input("SKU cannot be empty"));
    }
    if input.stock < 0 {
        return Err(Error::InvalidQuantity {
            quantity: i64::from(input.stock),
        });
    }
    non_negative_price(input.price, "price")?;
    non_negative_price(input.cost_price, "cost price")?;

    let _product = Product::find_by_id(input.product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound {
            id: input.product_id,
        })?;

    if find_variant_by_sku(db, input.product_id, &sku).await?.is_some() {
        return Err(Error::invalid_input(format!(
            "SKU {sku} already exists for product {}",
            input.product_id
        )));
    }

    let variant = product_variant::ActiveModel {
        product_id: Set(input.product_id),
        size: Set(input.size),
        color: Set(input.color),
        sku: Set(sku),
        price: Set(input.price),
        cost_price: Set(input.cost_price),
        stock: Set(input.stock),
        updated_at: Set(current_timestamp()),
        ..Default::default()
    };
    variant.insert(db).await.map_err(Into::into)
}

/// Applies a [`VariantUpdate`] in a single UPDATE statement and returns the updated row.
///
/// An empty update writes nothing and returns the row as stored.
///
/// # Errors
/// Returns [`Error::VariantNotFound`] when no variant has `variant_id`.
#[instrument(skip(db))]
pub async fn apply_variant_update<C>(
    db: &C,
    variant_id: i64,
    update: &VariantUpdate,
) -> Result<product_variant::Model>
where
    C: ConnectionTrait,
{
    if update.is_empty() {
        return get_variant_by_id(db, variant_id)
            .await?
            .ok_or(Error::VariantNotFound { id: variant_id });
    }

    let mut query = ProductVariant::update_many()
        .col_expr(
            product_variant::Column::Stock,
            Expr::col(product_variant::Column::Stock).add(update.stock_delta),
        )
        .col_expr(
            product_variant::Column::UpdatedAt,
            Expr::value(current_timestamp()),
        );

    if let Some(size) = &update.size {
        query = query.col_expr(product_variant::Column::Size, Expr::value(size.clone()));
    }
    if let Some(color) = &update.color {
        query = query.col_expr(product_variant::Column::Color, Expr::value(color.clone()));
    }
    if let Some(price) = update.price {
        query = query.col_expr(product_variant::Column::Price, Expr::value(price));
    }
    if let Some(cost_price) = update.cost_price {
        query = query.col_expr(product_variant::Column::CostPrice, Expr::value(cost_price));
    }

    let result = query
        .filter(product_variant::Column::Id.eq(variant_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::VariantNotFound { id: variant_id });
    }
    debug!("Variant {} updated", variant_id);

    ProductVariant::find_by_id(variant_id)
        .one(db)
        .await?
        .ok_or(Error::VariantNotFound { id: variant_id })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_product(
            &db,
            NewProduct {
                title: "   ".to_string(),
                base_price: 100,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let result = create_product(
            &db,
            NewProduct {
                title: "Linen Shirt".to_string(),
                base_price: -1,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { .. }));

        let result = create_product(
            &db,
            NewProduct {
                title: "Linen Shirt".to_string(),
                base_price: 100,
                discount_percent: f64::NAN,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_variant_rejects_duplicate_sku() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;

        let result = create_variant(
            &db,
            NewVariant {
                product_id: product.id,
                sku: format!("  {}  ", variant.sku),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_same_sku_allowed_on_different_products() -> Result<()> {
        let (db, _product, variant) = setup_with_variant().await?;
        let other = create_test_product(&db, "Other Shirt", 500).await?;

        let twin = create_test_variant(&db, other.id, &variant.sku, None, 0).await?;
        assert_eq!(twin.sku, variant.sku);
        assert_ne!(twin.id, variant.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_variant_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_variant(
            &db,
            NewVariant {
                product_id: 404,
                sku: "SKU-1".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: 404 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_variant_update_partial() -> Result<()> {
        let (db, _product, variant) = setup_with_variant().await?;

        let updated = apply_variant_update(
            &db,
            variant.id,
            &VariantUpdate {
                color: Some("navy".to_string()),
                stock_delta: 4,
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.stock, variant.stock + 4);
        assert_eq!(updated.color.as_deref(), Some("navy"));
        assert_eq!(updated.size, variant.size);
        assert_eq!(updated.price, variant.price);
        assert_eq!(updated.cost_price, variant.cost_price);

        Ok(())
    }

    #[tokio::test]
    async fn test_apply_variant_update_missing_variant() -> Result<()> {
        let db = setup_test_db().await?;

        let result = apply_variant_update(&db, 77, &VariantUpdate::default()).await;
        assert!(matches!(result.unwrap_err(), Error::VariantNotFound { id: 77 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_variant_update_writes_nothing() -> Result<()> {
        let (db, _product, variant) = setup_with_variant().await?;
        let variant_id = variant.id;
        let mut stale: product_variant::ActiveModel = variant.into();
        stale.updated_at = Set(current_timestamp() - chrono::Duration::days(1));
        let before = stale.update(&db).await?;

        let after = apply_variant_update(&db, variant_id, &VariantUpdate::default()).await?;
        assert_eq!(after, before);

        Ok(())
    }

    #[test]
    fn test_variant_update_is_empty() {
        assert!(VariantUpdate::default().is_empty());
        assert!(
            !VariantUpdate {
                stock_delta: 1,
                ..Default::default()
            }
            .is_empty()
        );
    }
}
