//! Inventory import record entity - Append-only audit trail of stock intake.
//!
//! One row is written per spreadsheet row and per purchase order line. Rows are never
//! updated or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory import record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_import_records")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product the stock was added to
    pub product_id: i64,
    /// Variant the stock was added to
    pub variant_id: i64,
    /// SKU at the time of intake
    pub sku: String,
    /// Size at the time of intake
    pub size: Option<String>,
    /// Color at the time of intake
    pub color: Option<String>,
    /// Units added
    pub quantity: i32,
    /// Cost price supplied with the intake, in minor units
    pub cost_price: Option<i64>,
    /// Selling price supplied with the intake, in minor units
    pub selling_price: Option<i64>,
    /// Supplier, when the intake came from a purchase order
    pub supplier_id: Option<i64>,
    /// Purchase order the intake belongs to
    pub purchase_order_id: Option<i64>,
    /// Spreadsheet file name the row came from
    pub source_file: Option<String>,
    /// When the record was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `InventoryImportRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record references one variant
    #[sea_orm(
        belongs_to = "super::product_variant::Entity",
        from = "Column::VariantId",
        to = "super::product_variant::Column::Id"
    )]
    ProductVariant,
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductVariant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
