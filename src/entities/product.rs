//! Product entity - The catalog item that variants specialize.
//!
//! Products carry the base price every variant falls back to when it has no price
//! override of its own. The static `discount_percent` is informational and independent
//! of time-bounded sales.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category reference (owned by the catalog)
    pub category_id: Option<i64>,
    /// Brand reference (owned by the catalog)
    pub brand_id: Option<i64>,
    /// Display title
    pub title: String,
    /// Base price in minor currency units
    pub base_price: i64,
    /// Static discount percentage shown on the listing
    pub discount_percent: f64,
    /// Thumbnail path or URL
    pub thumbnail: Option<String>,
    /// Target gender for apparel
    pub gender: Option<String>,
    /// Material description
    pub material: Option<String>,
    /// When the product was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many variants
    #[sea_orm(has_many = "super::product_variant::Entity")]
    Variants,
    /// One product appears in many sale links
    #[sea_orm(has_many = "super::sale_detail::Entity")]
    SaleDetails,
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
    }
}

impl Related<super::sale_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
