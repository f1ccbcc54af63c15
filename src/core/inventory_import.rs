//! Inventory importer - Applies normalized spreadsheet rows to product variants.
//!
//! The spreadsheet parser hands over one [`ImportRow`] per data row. Rows are cleaned up,
//! grouped by product and applied one product at a time: each product's rows commit
//! together or not at all. An existing SKU gets its stock incremented and any supplied
//! attributes overwritten; an unknown SKU becomes a new variant. Every applied row leaves
//! an [`inventory_import_record`] behind.

use crate::{
    core::{
        catalog::{self, NewVariant, VariantUpdate},
        current_timestamp,
    },
    entities::{
        InventoryImportRecord, Product, inventory_import_record, product_variant,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// One normalized spreadsheet row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportRow {
    /// SKU identifying the variant within its product
    pub sku: String,
    /// Target product; the caller's default applies when absent
    #[serde(default)]
    pub product_id: Option<i64>,
    /// Size label
    #[serde(default)]
    pub size: Option<String>,
    /// Color label
    #[serde(default)]
    pub color: Option<String>,
    /// Units received
    pub quantity: i32,
    /// Purchase cost in minor units
    #[serde(default)]
    pub cost_price: Option<i64>,
    /// Selling price in minor units
    #[serde(default)]
    pub selling_price: Option<i64>,
}

/// Context shared by all rows of one import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Product used for rows that do not name one
    pub default_product_id: Option<i64>,
    /// Supplier the goods came from, if known
    pub supplier_id: Option<i64>,
    /// Name of the uploaded spreadsheet
    pub source_file: Option<String>,
}

/// Result of importing the rows of one product.
#[derive(Debug, Clone)]
pub struct ProductImportSummary {
    /// Product the rows were applied to
    pub product_id: i64,
    /// Variants created by this import
    pub created: usize,
    /// Existing variants restocked by this import
    pub updated: usize,
    /// Audit records written, one per row
    pub records: Vec<inventory_import_record::Model>,
}

impl ProductImportSummary {
    /// Total units added across all rows.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.records
            .iter()
            .map(|record| i64::from(record.quantity))
            .sum()
    }
}

/// Audit entry written by both the importer and the purchase order engine.
pub(crate) struct AuditEntry<'a> {
    pub variant: &'a product_variant::Model,
    pub quantity: i32,
    pub cost_price: Option<i64>,
    pub selling_price: Option<i64>,
    pub supplier_id: Option<i64>,
    pub purchase_order_id: Option<i64>,
    pub source_file: Option<&'a str>,
}

/// Appends one record to the inventory audit trail.
pub(crate) async fn append_record<C>(
    db: &C,
    entry: AuditEntry<'_>,
) -> Result<inventory_import_record::Model>
where
    C: ConnectionTrait,
{
    inventory_import_record::ActiveModel {
        product_id: Set(entry.variant.product_id),
        variant_id: Set(entry.variant.id),
        sku: Set(entry.variant.sku.clone()),
        size: Set(entry.variant.size.clone()),
        color: Set(entry.variant.color.clone()),
        quantity: Set(entry.quantity),
        cost_price: Set(entry.cost_price),
        selling_price: Set(entry.selling_price),
        supplier_id: Set(entry.supplier_id),
        purchase_order_id: Set(entry.purchase_order_id),
        source_file: Set(entry.source_file.map(str::to_string)),
        created_at: Set(current_timestamp()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

fn clean_label(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_price(value: Option<i64>, field: &str, sku: &str) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(Error::InvalidPrice {
            message: format!("{field} for SKU {sku} cannot be negative ({v})"),
        }),
        _ => Ok(()),
    }
}

/// Cleans rows and groups them by target product.
///
/// Rows with a blank SKU or a non-positive quantity are dropped. SKU and labels are trimmed
/// and blank labels become absent. Products come out in ascending id order.
///
/// # Errors
/// Returns [`Error::InvalidPrice`] for a negative price and [`Error::InvalidInput`] for a
/// kept row with no usable product id.
pub fn normalize_rows(
    rows: Vec<ImportRow>,
    default_product_id: Option<i64>,
) -> Result<BTreeMap<i64, Vec<ImportRow>>> {
    let mut groups: BTreeMap<i64, Vec<ImportRow>> = BTreeMap::new();

    for row in rows {
        let sku = row.sku.trim().to_string();
        if sku.is_empty() || row.quantity <= 0 {
            debug!(
                "Skipping import row sku='{}' quantity={}",
                row.sku, row.quantity
            );
            continue;
        }
        check_price(row.cost_price, "cost price", &sku)?;
        check_price(row.selling_price, "selling price", &sku)?;

        let product_id = row
            .product_id
            .or(default_product_id)
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::invalid_input(format!("Row for SKU {sku} has no product id")))?;

        groups.entry(product_id).or_default().push(ImportRow {
            sku,
            product_id: Some(product_id),
            size: clean_label(row.size),
            color: clean_label(row.color),
            ..row
        });
    }

    Ok(groups)
}

/// Imports rows that may target several products.
///
/// Rows are normalized and grouped by product (see [`normalize_rows`]). Every target
/// product is checked before anything is written; each product's rows are then applied in
/// their own transaction. Within a product, a row whose SKU already exists adds its quantity
/// to the variant's stock and overwrites the supplied size, color and prices; an unknown SKU
/// creates a new variant. Every applied row appends one audit record.
///
/// # Arguments
/// * `rows` - Parsed spreadsheet rows
/// * `options` - Default product for rows without one, supplier and source file name
///
/// # Errors
/// Returns an error if:
/// - Normalization fails (see [`normalize_rows`])
/// - No row survives normalization ([`Error::EmptyImport`])
/// - A target product does not exist ([`Error::ProductNotFound`])
/// - A database step fails; batches already committed for earlier products stay applied
#[instrument(skip(db, rows), fields(rows = rows.len()))]
pub async fn import_inventory(
    db: &DatabaseConnection,
    rows: Vec<ImportRow>,
    options: &ImportOptions,
) -> Result<Vec<ProductImportSummary>> {
    let groups = normalize_rows(rows, options.default_product_id)?;
    if groups.is_empty() {
        return Err(Error::EmptyImport {
            product_id: options.default_product_id.unwrap_or_default(),
        });
    }

    for product_id in groups.keys() {
        Product::find_by_id(*product_id)
            .one(db)
            .await?
            .ok_or(Error::ProductNotFound { id: *product_id })?;
    }

    let mut summaries = Vec::with_capacity(groups.len());
    for (product_id, rows) in groups {
        summaries.push(apply_product_batch(db, product_id, &rows, options).await?);
    }
    Ok(summaries)
}

/// Imports rows into a single product.
///
/// `product_id` fills in rows that do not name a product. A row naming a different product
/// rejects the whole batch before anything is written.
///
/// # Errors
/// Returns [`Error::InvalidInput`] when a row targets another product,
/// [`Error::ProductNotFound`] for an unknown product and [`Error::EmptyImport`] when no row
/// survives normalization.
#[instrument(skip(db, rows, options), fields(rows = rows.len()))]
pub async fn import_product_rows(
    db: &DatabaseConnection,
    product_id: i64,
    rows: Vec<ImportRow>,
    options: &ImportOptions,
) -> Result<ProductImportSummary> {
    let mut groups = normalize_rows(rows, Some(product_id))?;
    if let Some(other) = groups.keys().find(|id| **id != product_id) {
        return Err(Error::invalid_input(format!(
            "Row targets product {other} in an import for product {product_id}"
        )));
    }
    let rows = groups.remove(&product_id).unwrap_or_default();
    if rows.is_empty() {
        return Err(Error::EmptyImport { product_id });
    }
    apply_product_batch(db, product_id, &rows, options).await
}

async fn apply_product_batch(
    db: &DatabaseConnection,
    product_id: i64,
    rows: &[ImportRow],
    options: &ImportOptions,
) -> Result<ProductImportSummary> {
    let txn = db.begin().await?;

    Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let mut created = 0;
    let mut updated = 0;
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let variant = match catalog::find_variant_by_sku(&txn, product_id, &row.sku).await? {
            Some(existing) => {
                updated += 1;
                let update = VariantUpdate {
                    size: row.size.clone(),
                    color: row.color.clone(),
                    price: row.selling_price,
                    cost_price: row.cost_price,
                    stock_delta: row.quantity,
                };
                catalog::apply_variant_update(&txn, existing.id, &update).await?
            }
            None => {
                created += 1;
                catalog::create_variant(
                    &txn,
                    NewVariant {
                        product_id,
                        sku: row.sku.clone(),
                        size: row.size.clone(),
                        color: row.color.clone(),
                        price: row.selling_price,
                        cost_price: row.cost_price,
                        stock: row.quantity,
                    },
                )
                .await?
            }
        };

        let record = append_record(
            &txn,
            AuditEntry {
                variant: &variant,
                quantity: row.quantity,
                cost_price: row.cost_price,
                selling_price: row.selling_price,
                supplier_id: options.supplier_id,
                purchase_order_id: None,
                source_file: options.source_file.as_deref(),
            },
        )
        .await?;
        records.push(record);
    }

    txn.commit().await?;

    info!(
        "Imported {} rows into product {} ({} created, {} updated)",
        records.len(),
        product_id,
        created,
        updated
    );
    Ok(ProductImportSummary {
        product_id,
        created,
        updated,
        records,
    })
}

/// Lists the audit records of a variant, oldest first.
pub async fn list_import_records_for_variant<C>(
    db: &C,
    variant_id: i64,
) -> Result<Vec<inventory_import_record::Model>>
where
    C: ConnectionTrait,
{
    InventoryImportRecord::find()
        .filter(inventory_import_record::Column::VariantId.eq(variant_id))
        .order_by_asc(inventory_import_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::ProductVariant;
    use crate::test_utils::*;

    fn row(sku: &str, quantity: i32) -> ImportRow {
        ImportRow {
            sku: sku.to_string(),
            quantity,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_rows_filters_and_groups() {
        let rows = vec![
            ImportRow {
                sku: "  A-1 ".to_string(),
                size: Some("  ".to_string()),
                color: Some(" red ".to_string()),
                ..row("", 2)
            },
            row("", 5),
            row("B-1", 0),
            ImportRow {
                product_id: Some(9),
                ..row("C-1", 1)
            },
        ];

        let groups = normalize_rows(rows, Some(3)).unwrap();
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![3, 9]);
        let first = &groups[&3][0];
        assert_eq!(first.sku, "A-1");
        assert_eq!(first.size, None);
        assert_eq!(first.color.as_deref(), Some("red"));
        assert_eq!(groups[&9][0].sku, "C-1");
    }

    #[test]
    fn test_normalize_rows_requires_product() {
        let result = normalize_rows(vec![row("A-1", 1)], None);
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));
    }

    #[test]
    fn test_normalize_rows_rejects_negative_price() {
        let rows = vec![ImportRow {
            cost_price: Some(-1),
            ..row("A-1", 1)
        }];
        let result = normalize_rows(rows, Some(1));
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { .. }));
    }

    #[tokio::test]
    async fn test_import_existing_sku_increments_stock() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;

        let summary = import_product_rows(
            &db,
            product.id,
            vec![ImportRow {
                color: Some("white".to_string()),
                ..row(&variant.sku, 7)
            }],
            &ImportOptions::default(),
        )
        .await?;
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.created, 0);

        let after = ProductVariant::find_by_id(variant.id).one(&db).await?.unwrap();
        assert_eq!(after.stock, variant.stock + 7);
        assert_eq!(after.color.as_deref(), Some("white"));
        // Omitted fields stay as they were
        assert_eq!(after.size, variant.size);
        assert_eq!(after.price, variant.price);
        assert_eq!(after.cost_price, variant.cost_price);

        Ok(())
    }

    #[tokio::test]
    async fn test_import_new_sku_creates_variant() -> Result<()> {
        let (db, product, _variant) = setup_with_variant().await?;

        let summary = import_product_rows(
            &db,
            product.id,
            vec![ImportRow {
                size: Some("L".to_string()),
                cost_price: Some(300),
                selling_price: Some(900),
                ..row("SKU-NEW", 12)
            }],
            &ImportOptions {
                source_file: Some("april.xlsx".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(summary.created, 1);
        assert_eq!(summary.total_quantity(), 12);

        let created = catalog::find_variant_by_sku(&db, product.id, "SKU-NEW")
            .await?
            .unwrap();
        assert_eq!(created.stock, 12);
        assert_eq!(created.size.as_deref(), Some("L"));
        assert_eq!(created.price, Some(900));
        assert_eq!(created.cost_price, Some(300));

        let records = list_import_records_for_variant(&db, created.id).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 12);
        assert_eq!(records[0].source_file.as_deref(), Some("april.xlsx"));
        assert_eq!(records[0].purchase_order_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_import_repeated_sku_in_one_batch() -> Result<()> {
        let (db, product, _variant) = setup_with_variant().await?;

        let summary = import_product_rows(
            &db,
            product.id,
            vec![row("SKU-DUP", 2), row("SKU-DUP", 3)],
            &ImportOptions::default(),
        )
        .await?;
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.records.len(), 2);

        let variant = catalog::find_variant_by_sku(&db, product.id, "SKU-DUP")
            .await?
            .unwrap();
        assert_eq!(variant.stock, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_import_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;

        let result =
            import_product_rows(&db, 404, vec![row("A-1", 1)], &ImportOptions::default()).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: 404 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_import_empty_after_filtering() -> Result<()> {
        let (db, product, _variant) = setup_with_variant().await?;

        let result = import_product_rows(
            &db,
            product.id,
            vec![row("  ", 3), row("A-1", 0)],
            &ImportOptions::default(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::EmptyImport { .. }));
        assert!(InventoryImportRecord::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_single_product_import_rejects_row_for_other_product() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;
        let other = create_test_product(&db, "Second Product", 700).await?;

        let rows = vec![
            row(&variant.sku, 2),
            ImportRow {
                product_id: Some(other.id),
                ..row("OTHER-SKU", 3)
            },
        ];
        let result = import_product_rows(&db, product.id, rows, &ImportOptions::default()).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        let after = ProductVariant::find_by_id(variant.id).one(&db).await?.unwrap();
        assert_eq!(after.stock, variant.stock);
        assert!(
            catalog::find_variant_by_sku(&db, product.id, "OTHER-SKU")
                .await?
                .is_none()
        );
        assert!(InventoryImportRecord::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_single_product_import_accepts_matching_product_id() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;

        let rows = vec![ImportRow {
            product_id: Some(product.id),
            ..row(&variant.sku, 2)
        }];
        let summary = import_product_rows(&db, product.id, rows, &ImportOptions::default()).await?;
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.total_quantity(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_import_checks_every_product_before_writing() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;

        let rows = vec![
            row(&variant.sku, 5),
            ImportRow {
                product_id: Some(999),
                ..row("GHOST-1", 1)
            },
        ];
        let options = ImportOptions {
            default_product_id: Some(product.id),
            ..Default::default()
        };

        let result = import_inventory(&db, rows, &options).await;
        assert!(matches!(result.unwrap_err(), Error::ProductNotFound { id: 999 }));

        let after = ProductVariant::find_by_id(variant.id).one(&db).await?.unwrap();
        assert_eq!(after.stock, variant.stock);

        Ok(())
    }

    #[tokio::test]
    async fn test_import_batch_is_atomic() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;

        // The audit table is gone, so the first row's stock change must roll back
        db.execute_unprepared("DROP TABLE inventory_import_records")
            .await?;

        let result = import_product_rows(
            &db,
            product.id,
            vec![row(&variant.sku, 5), row("SKU-NEW", 2)],
            &ImportOptions::default(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        let after = ProductVariant::find_by_id(variant.id).one(&db).await?.unwrap();
        assert_eq!(after.stock, variant.stock);
        assert!(
            catalog::find_variant_by_sku(&db, product.id, "SKU-NEW")
                .await?
                .is_none()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_import_multiple_products() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;
        let other = create_test_product(&db, "Second Product", 700).await?;
        let supplier = create_test_supplier(&db, "Acme").await?;

        let rows = vec![
            row(&variant.sku, 1),
            ImportRow {
                product_id: Some(other.id),
                ..row("OTHER-1", 4)
            },
        ];
        let options = ImportOptions {
            default_product_id: Some(product.id),
            supplier_id: Some(supplier.id),
            source_file: None,
        };

        let summaries = import_inventory(&db, rows, &options).await?;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].product_id, product.id);
        assert_eq!(summaries[1].product_id, other.id);
        assert_eq!(summaries[1].records[0].supplier_id, Some(supplier.id));

        Ok(())
    }
}
