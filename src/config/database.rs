//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Composite uniqueness that the entity
//! derive cannot express (one cart line per user and variant, one SKU per product) is added
//! as explicit unique indexes.

use crate::entities::{
    CartItem, InventoryImportRecord, Order, OrderItem, Product, ProductVariant, PurchaseOrder,
    Sale, SaleDetail, Supplier, cart_item, product_variant,
};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://shopkeep.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back to a
/// local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

/// Establishes a connection using [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    connect(&get_database_url()).await
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    table
}

fn unique_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_cart_items_user_variant")
            .table(CartItem)
            .col(cart_item::Column::UserId)
            .col(cart_item::Column::VariantId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_product_variants_product_sku")
            .table(ProductVariant)
            .col(product_variant::Column::ProductId)
            .col(product_variant::Column::Sku)
            .unique()
            .if_not_exists()
            .to_owned(),
    ]
}

/// Creates all tables and unique indexes if they do not exist yet.
///
/// Safe to call on every startup.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children so foreign keys resolve on every backend
    let tables = [
        table_for(&schema, Product),
        table_for(&schema, ProductVariant),
        table_for(&schema, Sale),
        table_for(&schema, SaleDetail),
        table_for(&schema, Supplier),
        table_for(&schema, PurchaseOrder),
        table_for(&schema, CartItem),
        table_for(&schema, Order),
        table_for(&schema, OrderItem),
        table_for(&schema, InventoryImportRecord),
    ];

    for table in &tables {
        db.execute(builder.build(table)).await?;
    }
    for index in &unique_indexes() {
        db.execute(builder.build(index)).await?;
    }

    info!("Database tables ensured ({} tables)", tables.len());
    Ok(())
}
