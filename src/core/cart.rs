//! Cart ledger - Per-user cart lines with a frozen price snapshot.
//!
//! The snapshot is resolved once, when a user first adds a variant. Adding the same variant
//! again only bumps the quantity; quantity updates never touch the snapshot either. Cart
//! operations never change variant stock.

use crate::{
    core::{current_timestamp, pricing},
    entities::{CartItem, cart_item},
    errors::{Error, Result},
};
use sea_orm::{
    QueryOrder, Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{info, instrument};

/// Subtotal of one line in minor units.
#[must_use]
pub fn line_subtotal(price: i64, quantity: i32) -> i64 {
    price * i64::from(quantity)
}

fn require_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::invalid_input("User id cannot be empty"));
    }
    Ok(())
}

async fn find_line<C>(db: &C, user_id: &str, variant_id: i64) -> Result<Option<cart_item::Model>>
where
    C: ConnectionTrait,
{
    CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .filter(cart_item::Column::VariantId.eq(variant_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds `quantity` units of `variant_id` to the user's cart.
///
/// When the user already has a line for the variant its quantity is incremented and its
/// price snapshot is kept. Otherwise the pricing resolver is consulted once and a new line
/// is inserted with the resolved price. The insert is an upsert on `(user_id, variant_id)`,
/// so two concurrent first adds still end up as one line.
///
/// # Errors
/// Returns an error if:
/// - The user id is blank or the quantity is not positive
/// - The variant cannot be priced ([`Error::VariantNotFound`])
/// - The database operation fails
#[instrument(skip(db))]
pub async fn add_item(
    db: &DatabaseConnection,
    user_id: &str,
    variant_id: i64,
    quantity: i32,
) -> Result<cart_item::Model> {
    require_user(user_id)?;
    if quantity <= 0 {
        return Err(Error::InvalidQuantity {
            quantity: i64::from(quantity),
        });
    }

    let txn = db.begin().await?;

    if let Some(line) = find_line(&txn, user_id, variant_id).await? {
        CartItem::update_many()
            .col_expr(
                cart_item::Column::Quantity,
                Expr::col(cart_item::Column::Quantity).add(quantity),
            )
            .filter(cart_item::Column::Id.eq(line.id))
            .exec(&txn)
            .await?;
    } else {
        let price_snapshot = pricing::resolve_effective_price(&txn, variant_id).await?;
        let line = cart_item::ActiveModel {
            user_id: Set(user_id.to_string()),
            variant_id: Set(variant_id),
            quantity: Set(quantity),
            price_snapshot: Set(price_snapshot),
            created_at: Set(current_timestamp()),
            ..Default::default()
        };
        CartItem::insert(line)
            .on_conflict(
                OnConflict::columns([cart_item::Column::UserId, cart_item::Column::VariantId])
                    .value(
                        cart_item::Column::Quantity,
                        Expr::col(cart_item::Column::Quantity).add(quantity),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
    }

    let line = find_line(&txn, user_id, variant_id).await?.ok_or_else(|| {
        DbErr::RecordNotFound(format!("cart line for variant {variant_id}"))
    })?;
    txn.commit().await?;

    info!(
        "Cart line {} for user {}: variant {} x{} @ {}",
        line.id, user_id, variant_id, line.quantity, line.price_snapshot
    );
    Ok(line)
}

/// Sets the quantity of one of the user's cart lines.
///
/// A quantity of zero or less removes the line and returns `None`.
///
/// # Errors
/// Returns [`Error::CartItemNotFound`] when the line does not exist or belongs to another
/// user.
#[instrument(skip(db))]
pub async fn update_item(
    db: &DatabaseConnection,
    user_id: &str,
    item_id: i64,
    quantity: i32,
) -> Result<Option<cart_item::Model>> {
    let line = CartItem::find_by_id(item_id)
        .filter(cart_item::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::CartItemNotFound { id: item_id })?;

    if quantity <= 0 {
        line.delete(db).await?;
        info!("Removed cart line {} for user {}", item_id, user_id);
        return Ok(None);
    }

    let mut line: cart_item::ActiveModel = line.into();
    line.quantity = Set(quantity);
    let line = line.update(db).await?;
    Ok(Some(line))
}

/// Removes one of the user's cart lines.
///
/// # Errors
/// Returns [`Error::CartItemNotFound`] when nothing was removed.
pub async fn remove_item(db: &DatabaseConnection, user_id: &str, item_id: i64) -> Result<()> {
    let result = CartItem::delete_many()
        .filter(cart_item::Column::Id.eq(item_id))
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::CartItemNotFound { id: item_id });
    }
    Ok(())
}

/// Empties the user's cart and returns how many lines were removed.
pub async fn clear_cart(db: &DatabaseConnection, user_id: &str) -> Result<u64> {
    let result = CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Lists the user's cart lines in the order they were added.
pub async fn list_cart<C>(db: &C, user_id: &str) -> Result<Vec<cart_item::Model>>
where
    C: ConnectionTrait,
{
    CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .order_by_asc(cart_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sum of snapshot price times quantity over the user's cart, in minor units.
pub async fn cart_total(db: &DatabaseConnection, user_id: &str) -> Result<i64> {
    let lines = list_cart(db, user_id).await?;
    Ok(lines
        .iter()
        .map(|line| line_subtotal(line.price_snapshot, line.quantity))
        .sum())
}
