//! Purchase order entity - Header row of a supplier restocking batch.
//!
//! The individual lines live in `inventory_import_records`, linked by `purchase_order_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    /// Unique identifier for the purchase order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplier that delivered the goods
    pub supplier_id: i64,
    /// Free-form note
    pub note: Option<String>,
    /// When the purchase order was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PurchaseOrder` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase order belongs to one supplier
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
