//! Cart item entity - One line of a user's cart.
//!
//! `price_snapshot` is captured once when the line is first created and never rewritten.
//! A user has at most one line per variant (enforced by a composite unique index).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the cart line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the cart
    pub user_id: String,
    /// Variant being purchased
    pub variant_id: i64,
    /// Units requested, always at least 1
    pub quantity: i32,
    /// Unit price in minor units at the time the line was created
    pub price_snapshot: i64,
    /// When the line was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CartItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart line references one variant
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
