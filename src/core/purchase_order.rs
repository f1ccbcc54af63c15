//! Purchase order engine - Supplier restocking that resets variant cost and price.
//!
//! A purchase order is applied in one transaction: the header row is written first so the
//! audit records can point at it, then every line adds stock and overwrites the variant's
//! cost and selling price with the line's values. Any invalid line aborts the whole order.

use crate::{
    core::{
        catalog::{self, VariantUpdate},
        current_timestamp,
        inventory_import::{AuditEntry, append_record},
        supplier,
    },
    entities::{InventoryImportRecord, PurchaseOrder, inventory_import_record, purchase_order},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// One requested purchase order line, as received from the caller.
///
/// Prices arrive as plain numbers in minor units and are validated by the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseOrderItemInput {
    /// Variant being restocked
    pub variant_id: i64,
    /// Units received
    pub quantity: i32,
    /// Unit cost
    #[serde(default)]
    pub cost_price: Option<f64>,
    /// New selling price
    #[serde(default)]
    pub selling_price: Option<f64>,
}

/// A validated purchase order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrderLine {
    /// Restocked variant
    pub variant_id: i64,
    /// Product of the variant
    pub product_id: i64,
    /// SKU of the variant
    pub sku: String,
    /// Units received
    pub quantity: i32,
    /// Unit cost in minor units
    pub cost_price: i64,
    /// Selling price in minor units
    pub selling_price: i64,
}

/// A purchase order with its normalized lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrderSummary {
    /// The purchase order header
    pub purchase_order: purchase_order::Model,
    /// The applied lines
    pub items: Vec<PurchaseOrderLine>,
    /// Sum of line quantities
    pub total_quantity: i64,
}

impl PurchaseOrderSummary {
    fn new(purchase_order: purchase_order::Model, items: Vec<PurchaseOrderLine>) -> Self {
        let total_quantity = items.iter().map(|item| i64::from(item.quantity)).sum();
        Self {
            purchase_order,
            items,
            total_quantity,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ValidatedItem {
    variant_id: i64,
    quantity: i32,
    cost_price: i64,
    selling_price: i64,
}

/// Converts a caller-supplied amount into whole minor units.
///
/// # Errors
/// Returns [`Error::InvalidPrice`] when the amount is missing, not finite or negative.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_currency(value: Option<f64>, field: &str) -> Result<i64> {
    let amount = value.ok_or_else(|| Error::InvalidPrice {
        message: format!("{field} is required"),
    })?;
    if !amount.is_finite() || amount < 0.0 || amount > i64::MAX as f64 {
        return Err(Error::InvalidPrice {
            message: format!("{field} must be a non-negative amount, got {amount}"),
        });
    }
    Ok(amount.round() as i64)
}

fn check_item_values(item: &PurchaseOrderItemInput) -> Result<ValidatedItem> {
    if item.quantity <= 0 {
        return Err(Error::InvalidQuantity {
            quantity: i64::from(item.quantity),
        });
    }
    let cost_price = parse_currency(item.cost_price, "cost price")?;
    let selling_price = parse_currency(item.selling_price, "selling price")?;
    if cost_price >= selling_price {
        return Err(Error::MarginInvalid {
            cost_price,
            selling_price,
        });
    }
    Ok(ValidatedItem {
        variant_id: item.variant_id,
        quantity: item.quantity,
        cost_price,
        selling_price,
    })
}

/// Checks one line in order: variant exists, quantity, prices, margin.
async fn validate_item(
    db: &DatabaseConnection,
    item: &PurchaseOrderItemInput,
) -> Result<ValidatedItem> {
    if item.variant_id <= 0 {
        return Err(Error::VariantNotFound {
            id: item.variant_id,
        });
    }
    catalog::get_variant_by_id(db, item.variant_id)
        .await?
        .ok_or(Error::VariantNotFound {
            id: item.variant_id,
        })?;
    check_item_values(item)
}

/// Records a supplier delivery and applies it to the variants.
///
/// Lines are checked one after another before anything is written; the first failing line
/// decides the error. Inside one transaction the purchase order header is inserted, then
/// every line adds its quantity to the variant's stock, overwrites the variant's cost and
/// selling price, and appends an audit record pointing at the purchase order.
///
/// # Arguments
/// * `supplier_id` - Supplier that delivered the goods
/// * `note` - Optional free-form note; blank notes are stored as absent
/// * `items` - Requested lines, at least one
///
/// # Errors
/// Returns an error if:
/// - The supplier does not exist ([`Error::SupplierNotFound`])
/// - `items` is empty ([`Error::InvalidInput`])
/// - A line references a missing variant ([`Error::VariantNotFound`]), has a non-positive
///   quantity ([`Error::InvalidQuantity`]), a missing, non-finite or negative price
///   ([`Error::InvalidPrice`]), or a cost not below its selling price
///   ([`Error::MarginInvalid`])
///
/// Nothing is written when any of these occur.
#[instrument(skip(db, note, items), fields(items = items.len()))]
pub async fn create_purchase_order(
    db: &DatabaseConnection,
    supplier_id: i64,
    note: Option<String>,
    items: &[PurchaseOrderItemInput],
) -> Result<PurchaseOrderSummary> {
    supplier::get_supplier_by_id(db, supplier_id)
        .await?
        .ok_or(Error::SupplierNotFound { id: supplier_id })?;
    if items.is_empty() {
        return Err(Error::invalid_input(
            "Purchase order needs at least one item",
        ));
    }

    let mut validated = Vec::with_capacity(items.len());
    for item in items {
        let checked = validate_item(db, item)
            .await
            .inspect_err(|e| warn!("Rejected purchase order for supplier {}: {}", supplier_id, e))?;
        validated.push(checked);
    }

    let txn = db.begin().await?;

    let purchase_order = purchase_order::ActiveModel {
        supplier_id: Set(supplier_id),
        note: Set(note.filter(|n| !n.trim().is_empty())),
        created_at: Set(current_timestamp()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut lines = Vec::with_capacity(validated.len());
    for item in validated {
        let update = VariantUpdate {
            price: Some(item.selling_price),
            cost_price: Some(item.cost_price),
            stock_delta: item.quantity,
            ..Default::default()
        };
        let variant = catalog::apply_variant_update(&txn, item.variant_id, &update).await?;

        append_record(
            &txn,
            AuditEntry {
                variant: &variant,
                quantity: item.quantity,
                cost_price: Some(item.cost_price),
                selling_price: Some(item.selling_price),
                supplier_id: Some(supplier_id),
                purchase_order_id: Some(purchase_order.id),
                source_file: None,
            },
        )
        .await?;

        lines.push(PurchaseOrderLine {
            variant_id: variant.id,
            product_id: variant.product_id,
            sku: variant.sku,
            quantity: item.quantity,
            cost_price: item.cost_price,
            selling_price: item.selling_price,
        });
    }

    txn.commit().await?;

    let summary = PurchaseOrderSummary::new(purchase_order, lines);
    info!(
        "Purchase order {} from supplier {}: {} lines, {} units",
        summary.purchase_order.id,
        supplier_id,
        summary.items.len(),
        summary.total_quantity
    );
    Ok(summary)
}

/// Rebuilds a purchase order summary from its audit records.
///
/// # Errors
/// Returns [`Error::PurchaseOrderNotFound`] when the purchase order does not exist.
pub async fn get_purchase_order<C>(db: &C, purchase_order_id: i64) -> Result<PurchaseOrderSummary>
where
    C: ConnectionTrait,
{
    let purchase_order = PurchaseOrder::find_by_id(purchase_order_id)
        .one(db)
        .await?
        .ok_or(Error::PurchaseOrderNotFound {
            id: purchase_order_id,
        })?;

    let records = InventoryImportRecord::find()
        .filter(inventory_import_record::Column::PurchaseOrderId.eq(purchase_order_id))
        .order_by_asc(inventory_import_record::Column::Id)
        .all(db)
        .await?;

    let items = records
        .into_iter()
        .map(|record| PurchaseOrderLine {
            variant_id: record.variant_id,
            product_id: record.product_id,
            sku: record.sku,
            quantity: record.quantity,
            cost_price: record.cost_price.unwrap_or_default(),
            selling_price: record.selling_price.unwrap_or_default(),
        })
        .collect();

    Ok(PurchaseOrderSummary::new(purchase_order, items))
}

/// Lists purchase orders, newest first, optionally for one supplier.
pub async fn list_purchase_orders(
    db: &DatabaseConnection,
    supplier_id: Option<i64>,
) -> Result<Vec<purchase_order::Model>> {
    let mut query = PurchaseOrder::find();
    if let Some(supplier_id) = supplier_id {
        query = query.filter(purchase_order::Column::SupplierId.eq(supplier_id));
    }
    query
        .order_by_desc(purchase_order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
