//! Pricing resolver - Computes the price a customer pays for a variant right now.
//!
//! The base price is the variant's own override when present, else the product's base
//! price. The best discount among the sales active for the product is then applied and the
//! result rounded half away from zero to a whole minor unit, never below zero.

use crate::{
    core::{current_timestamp, sale},
    entities::{Product, ProductVariant, product_variant},
    errors::{Error, Result},
};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{ConnectionTrait, EntityTrait};

/// Breakdown of a resolved price.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice {
    /// The variant that was priced
    pub variant: product_variant::Model,
    /// Variant override or product base price, in minor units
    pub base_price: i64,
    /// Best active discount percentage, 0 when no sale applies
    pub discount_percent: f64,
    /// Price after discount, in minor units
    pub effective_price: i64,
}

/// Applies `discount_percent` to `base_price`.
///
/// Invalid or non-positive discounts leave the price untouched. Rounding is half away from
/// zero and the result is floored at 0.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn apply_discount(base_price: i64, discount_percent: f64) -> i64 {
    let discount = sale::sanitize_discount(discount_percent);
    if discount > 0.0 {
        let base = base_price as f64;
        // f64::round rounds half away from zero
        let discounted = (base - base * discount / 100.0).round();
        discounted.max(0.0) as i64
    } else {
        base_price
    }
}

/// Resolves the price of `variant_id` as of `now`.
///
/// # Errors
/// Returns [`Error::VariantNotFound`] when the variant does not exist, or
/// [`Error::ProductNotFound`] when its parent product is missing.
pub async fn resolve_price_at<C>(
    db: &C,
    variant_id: i64,
    now: DateTime<Utc>,
) -> Result<ResolvedPrice>
where
    C: ConnectionTrait,
{
    let (variant, product) = ProductVariant::find_by_id(variant_id)
        .find_also_related(Product)
        .one(db)
        .await?
        .ok_or(Error::VariantNotFound { id: variant_id })?;
    let product = product.ok_or(Error::ProductNotFound {
        id: variant.product_id,
    })?;

    let base_price = variant.price.unwrap_or(product.base_price);
    let discount_percent =
        sale::best_active_discount(db, product.id, now.trunc_subsecs(0)).await?;
    let effective_price = apply_discount(base_price, discount_percent);

    Ok(ResolvedPrice {
        variant,
        base_price,
        discount_percent,
        effective_price,
    })
}

/// Resolves the current effective price of `variant_id` in minor units.
///
/// # Errors
/// Same as [`resolve_price_at`].
pub async fn resolve_effective_price<C>(db: &C, variant_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    resolve_price_at(db, variant_id, current_timestamp())
        .await
        .map(|resolved| resolved.effective_price)
}
