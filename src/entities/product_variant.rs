//! Product variant entity - The SKU-level unit that carries stock and pricing.
//!
//! Stock and prices are written by the inventory importer and the purchase order engine.
//! The SKU is unique within its product, not globally.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product variant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_variants")]
pub struct Model {
    /// Unique identifier for the variant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent product
    pub product_id: i64,
    /// Size label (e.g. "M", "42")
    pub size: Option<String>,
    /// Color label
    pub color: Option<String>,
    /// Stock keeping unit, unique per product
    pub sku: String,
    /// Price override in minor units; falls back to the product's base price when absent
    pub price: Option<i64>,
    /// Last recorded purchase cost in minor units
    pub cost_price: Option<i64>,
    /// Units on hand
    pub stock: i32,
    /// When the variant was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `ProductVariant` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each variant belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
