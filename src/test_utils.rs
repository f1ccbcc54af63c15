//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{catalog, current_timestamp, sale, supplier},
    entities,
    errors::Result,
};
use chrono::Duration;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test product with the given title and base price.
pub async fn create_test_product(
    db: &DatabaseConnection,
    title: &str,
    base_price: i64,
) -> Result<entities::product::Model> {
    catalog::create_product(
        db,
        catalog::NewProduct {
            title: title.to_string(),
            base_price,
            ..Default::default()
        },
    )
    .await
}

/// Creates a test variant.
///
/// # Defaults
/// * `size`: "M"
/// * `color`: "black"
/// * `cost_price`: None
pub async fn create_test_variant(
    db: &DatabaseConnection,
    product_id: i64,
    sku: &str,
    price: Option<i64>,
    stock: i32,
) -> Result<entities::product_variant::Model> {
    catalog::create_variant(
        db,
        catalog::NewVariant {
            product_id,
            sku: sku.to_string(),
            size: Some("M".to_string()),
            color: Some("black".to_string()),
            price,
            cost_price: None,
            stock,
        },
    )
    .await
}

/// Creates a sale active for the next hour and links it to `product_id`.
pub async fn create_active_sale(
    db: &DatabaseConnection,
    product_id: i64,
    discount_percent: f64,
) -> Result<entities::sale::Model> {
    let now = current_timestamp();
    let sale = sale::create_sale(
        db,
        "Active sale",
        discount_percent,
        now - Duration::hours(1),
        now + Duration::hours(1),
    )
    .await?;
    sale::add_product_to_sale(db, sale.id, product_id).await?;
    Ok(sale)
}

/// Creates a sale that ran from three days ago until two days ago, linked to `product_id`.
pub async fn create_expired_sale(
    db: &DatabaseConnection,
    product_id: i64,
    discount_percent: f64,
) -> Result<entities::sale::Model> {
    let now = current_timestamp();
    let sale = sale::create_sale(
        db,
        "Expired sale",
        discount_percent,
        now - Duration::days(3),
        now - Duration::days(2),
    )
    .await?;
    sale::add_product_to_sale(db, sale.id, product_id).await?;
    Ok(sale)
}

/// Creates a test supplier.
pub async fn create_test_supplier(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::supplier::Model> {
    supplier::create_supplier(db, name, Some("1 Warehouse Way")).await
}

/// Sets up a complete test environment with a product and one variant.
///
/// # Defaults
/// * product base price: 1000
/// * variant sku "SKU-001", no price override, stock 10
pub async fn setup_with_variant() -> Result<(
    DatabaseConnection,
    entities::product::Model,
    entities::product_variant::Model,
)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Test Product", 1000).await?;
    let variant = create_test_variant(&db, product.id, "SKU-001", None, 10).await?;
    Ok((db, product, variant))
}
