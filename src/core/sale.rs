//! Sale business logic - Time-bounded promotional discounts.
//!
//! A sale covers products through `sale_details` links and is active while
//! `start_date <= now <= end_date`. Overlapping sales never stack: the price resolver only
//! uses the single best discount.

use crate::{
    core::current_timestamp,
    entities::{Product, Sale, SaleDetail, sale, sale_detail},
    errors::{Error, Result},
};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Returns true when `now` falls inside the sale window (both ends inclusive).
#[must_use]
pub fn is_active_at(sale: &sale::Model, now: DateTime<Utc>) -> bool {
    sale.start_date <= now && now <= sale.end_date
}

/// Clamps a stored discount to something usable: non-finite or non-positive values count
/// as no discount.
#[must_use]
pub fn sanitize_discount(discount_percent: f64) -> f64 {
    if discount_percent.is_finite() && discount_percent > 0.0 {
        discount_percent
    } else {
        0.0
    }
}

/// Creates a sale covering no products yet.
///
/// # Errors
/// Returns an error if the title is blank, the discount is not a finite percentage between
/// 0 and 100, or the window ends before it starts.
#[instrument(skip(db))]
pub async fn create_sale<C>(
    db: &C,
    title: &str,
    discount_percent: f64,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
) -> Result<sale::Model>
where
    C: ConnectionTrait,
{
    if title.trim().is_empty() {
        return Err(Error::invalid_input("Sale title cannot be empty"));
    }
    if !discount_percent.is_finite() || !(0.0..=100.0).contains(&discount_percent) {
        return Err(Error::invalid_input(format!(
            "Discount percent must be between 0 and 100, got {discount_percent}"
        )));
    }
    let start_date = start_date.trunc_subsecs(0);
    let end_date = end_date.trunc_subsecs(0);
    if end_date < start_date {
        return Err(Error::invalid_input("Sale cannot end before it starts"));
    }

    let sale = sale::ActiveModel {
        title: Set(title.trim().to_string()),
        discount_percent: Set(discount_percent),
        start_date: Set(start_date),
        end_date: Set(end_date),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created sale {} '{}' ({}%)",
        sale.id, sale.title, sale.discount_percent
    );
    Ok(sale)
}

/// Links a product to a sale. Linking twice returns the existing link.
///
/// # Errors
/// Returns [`Error::SaleNotFound`] or [`Error::ProductNotFound`] for unknown ids.
pub async fn add_product_to_sale<C>(
    db: &C,
    sale_id: i64,
    product_id: i64,
) -> Result<sale_detail::Model>
where
    C: ConnectionTrait,
{
    Sale::find_by_id(sale_id)
        .one(db)
        .await?
        .ok_or(Error::SaleNotFound { id: sale_id })?;
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let existing = SaleDetail::find()
        .filter(sale_detail::Column::SaleId.eq(sale_id))
        .filter(sale_detail::Column::ProductId.eq(product_id))
        .one(db)
        .await?;
    if let Some(link) = existing {
        return Ok(link);
    }

    sale_detail::ActiveModel {
        sale_id: Set(sale_id),
        product_id: Set(product_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Lists the sales covering `product_id` that are active at `now`.
pub async fn active_sales_for_product<C>(
    db: &C,
    product_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<sale::Model>>
where
    C: ConnectionTrait,
{
    let sales = Sale::find()
        .inner_join(SaleDetail)
        .filter(sale_detail::Column::ProductId.eq(product_id))
        .order_by_asc(sale::Column::Id)
        .all(db)
        .await?;

    Ok(sales
        .into_iter()
        .filter(|sale| is_active_at(sale, now))
        .collect())
}

/// Returns the highest usable discount among the sales active for `product_id` at `now`,
/// or 0 when none applies.
pub async fn best_active_discount<C>(db: &C, product_id: i64, now: DateTime<Utc>) -> Result<f64>
where
    C: ConnectionTrait,
{
    let sales = active_sales_for_product(db, product_id, now).await?;
    Ok(sales
        .iter()
        .map(|sale| sanitize_discount(sale.discount_percent))
        .fold(0.0, f64::max))
}

/// Lists the sales active right now, across all products.
pub async fn list_active_sales(db: &DatabaseConnection) -> Result<Vec<sale::Model>> {
    let now = current_timestamp();
    let sales = Sale::find().order_by_asc(sale::Column::Id).all(db).await?;
    Ok(sales
        .into_iter()
        .filter(|sale| is_active_at(sale, now))
        .collect())
}
