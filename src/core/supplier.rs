//! Supplier registry - Vendors that deliver purchase orders.

use crate::{
    config::seed::SupplierConfig,
    entities::{Supplier, supplier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a supplier.
///
/// # Errors
/// Returns [`Error::InvalidInput`] when the name is blank.
pub async fn create_supplier<C>(
    db: &C,
    name: &str,
    address: Option<&str>,
) -> Result<supplier::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::invalid_input("Supplier name cannot be empty"));
    }

    supplier::ActiveModel {
        name: Set(name.trim().to_string()),
        address: Set(address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Retrieves a supplier by ID.
pub async fn get_supplier_by_id<C>(db: &C, supplier_id: i64) -> Result<Option<supplier::Model>>
where
    C: ConnectionTrait,
{
    Supplier::find_by_id(supplier_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all suppliers ordered by name.
pub async fn list_suppliers(db: &DatabaseConnection) -> Result<Vec<supplier::Model>> {
    Supplier::find()
        .order_by_asc(supplier::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts the configured suppliers whose names are not present yet.
///
/// Returns the number of suppliers inserted.
pub async fn seed_suppliers(db: &DatabaseConnection, suppliers: &[SupplierConfig]) -> Result<usize> {
    let mut inserted = 0;
    for config in suppliers {
        let existing = Supplier::find()
            .filter(supplier::Column::Name.eq(config.name.trim()))
            .one(db)
            .await?;
        if existing.is_none() {
            create_supplier(db, &config.name, config.address.as_deref()).await?;
            inserted += 1;
        }
    }
    info!(
        "Seeded {} of {} configured suppliers",
        inserted,
        suppliers.len()
    );
    Ok(inserted)
}
