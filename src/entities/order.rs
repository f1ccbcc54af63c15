//! Order entity - A placed order created from a cart at checkout.
//!
//! Orders are immutable after creation except for `status`, which holds one of
//! `pending`, `paid`, `shipped`, `completed` or `cancelled`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who placed the order
    pub user_id: String,
    /// Shipping address
    pub address: String,
    /// Free-form customer note
    pub note: Option<String>,
    /// Lifecycle status, stored as its lowercase name
    pub status: String,
    /// Sum of line subtotals in minor units
    pub total_price: i64,
    /// When the order was placed
    pub created_at: DateTimeUtc,
    /// When the status was last changed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One order has many items
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
