//! Sale entity - A time-bounded promotional discount.
//!
//! A sale is active when `start_date <= now <= end_date`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Campaign title
    pub title: String,
    /// Discount percentage applied to covered products
    pub discount_percent: f64,
    /// First instant the sale applies (inclusive)
    pub start_date: DateTimeUtc,
    /// Last instant the sale applies (inclusive)
    pub end_date: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One sale covers many products through sale details
    #[sea_orm(has_many = "super::sale_detail::Entity")]
    SaleDetails,
}

impl Related<super::sale_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
