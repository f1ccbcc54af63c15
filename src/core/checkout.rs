//! Checkout - Converts a user's cart into an order in one transaction.
//!
//! Prices come from the cart lines' snapshots and are never re-resolved. Either the order,
//! all of its lines and the emptied cart are committed together, or nothing changes.
//! Checkout does not decrement variant stock.

use crate::{
    core::{
        cart::{self, line_subtotal},
        current_timestamp,
        order::{OrderStatus, OrderWithItems},
    },
    entities::{CartItem, cart_item, order, order_item},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Places an order from everything currently in the user's cart.
///
/// The cart is read inside the transaction, so lines added concurrently are either part of
/// the order or stay in the cart. The order is created as `pending` with a total equal to
/// the sum of snapshot price times quantity, one order item is written per cart line at its
/// snapshot price, and the cart is emptied. Prices are never re-resolved and stock is left
/// untouched.
///
/// # Arguments
/// * `user_id` - Owner of the cart being checked out
/// * `address` - Shipping address; surrounding whitespace is trimmed
/// * `note` - Optional customer note; blank notes are stored as absent
///
/// # Errors
/// Returns an error if:
/// - The address is blank ([`Error::InvalidInput`])
/// - The cart is empty ([`Error::EmptyCart`])
/// - Any database step fails, in which case the transaction is rolled back
#[instrument(skip(db, note))]
pub async fn create_order_from_cart(
    db: &DatabaseConnection,
    user_id: &str,
    address: &str,
    note: Option<String>,
) -> Result<OrderWithItems> {
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::invalid_input("Shipping address is required"));
    }

    let txn = db.begin().await?;

    let lines = cart::list_cart(&txn, user_id).await?;
    if lines.is_empty() {
        return Err(Error::EmptyCart);
    }

    let total_price: i64 = lines
        .iter()
        .map(|line| line_subtotal(line.price_snapshot, line.quantity))
        .sum();
    let now = current_timestamp();

    let order = order::ActiveModel {
        user_id: Set(user_id.to_string()),
        address: Set(address.to_string()),
        note: Set(note.filter(|n| !n.trim().is_empty())),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        total_price: Set(total_price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in &lines {
        let item = order_item::ActiveModel {
            order_id: Set(order.id),
            variant_id: Set(line.variant_id),
            quantity: Set(line.quantity),
            price: Set(line.price_snapshot),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        items.push(item);
    }

    CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    info!(
        "Order {} placed by {}: {} lines, total {}",
        order.id,
        user_id,
        items.len(),
        total_price
    );
    Ok(OrderWithItems { order, items })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Order, OrderItem, ProductVariant};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_checkout_requires_address() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_order_from_cart(&db, "user1", "   ", None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_order_from_cart(&db, "user1", "1 Main St", None).await;
        assert!(matches!(result.unwrap_err(), Error::EmptyCart));
        assert!(Order::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_without_address_leaves_cart() -> Result<()> {
        let (db, _product, variant) = setup_with_variant().await?;
        cart::add_item(&db, "user1", variant.id, 2).await?;

        let result = create_order_from_cart(&db, "user1", "", None).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidInput { .. }));
        assert_eq!(cart::list_cart(&db, "user1").await?.len(), 1);
        assert!(Order::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_uses_snapshots() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;
        let second = create_test_variant(&db, product.id, "SKU-002", Some(1250), 3).await?;

        cart::add_item(&db, "user1", variant.id, 2).await?;
        cart::add_item(&db, "user1", second.id, 1).await?;

        // A sale starting after the items were added must not affect the order
        create_active_sale(&db, product.id, 40.0).await?;

        let placed = create_order_from_cart(
            &db,
            "user1",
            " 1 Main St ",
            Some("Leave at door".to_string()),
        )
        .await?;

        assert_eq!(placed.order.total_price, 2 * 1000 + 1250);
        assert_eq!(placed.order.status, "pending");
        assert_eq!(placed.order.address, "1 Main St");
        assert_eq!(placed.order.note.as_deref(), Some("Leave at door"));
        assert_eq!(placed.items.len(), 2);
        assert_eq!(placed.items[0].price, 1000);
        assert_eq!(placed.items[0].quantity, 2);
        assert_eq!(placed.items[1].price, 1250);

        assert!(cart::list_cart(&db, "user1").await?.is_empty());

        // Stock is not decremented at checkout
        let after = ProductVariant::find_by_id(variant.id).one(&db).await?.unwrap();
        assert_eq!(after.stock, variant.stock);

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_only_consumes_own_cart() -> Result<()> {
        let (db, _product, variant) = setup_with_variant().await?;
        cart::add_item(&db, "user1", variant.id, 1).await?;
        cart::add_item(&db, "user2", variant.id, 4).await?;

        create_order_from_cart(&db, "user1", "1 Main St", None).await?;

        let remaining = cart::list_cart(&db, "user2").await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].quantity, 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_checkout_rolls_back() -> Result<()> {
        let (db, _product, variant) = setup_with_variant().await?;
        cart::add_item(&db, "user1", variant.id, 3).await?;
        let cart_before = cart::list_cart(&db, "user1").await?;

        // Inserting the order lines will fail after the order row is written
        db.execute_unprepared("DROP TABLE order_items").await?;

        let result = create_order_from_cart(&db, "user1", "1 Main St", None).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        assert!(Order::find().all(&db).await?.is_empty());
        assert_eq!(cart::list_cart(&db, "user1").await?, cart_before);

        Ok(())
    }

    #[tokio::test]
    async fn test_order_items_survive_later_price_changes() -> Result<()> {
        let (db, product, variant) = setup_with_variant().await?;
        cart::add_item(&db, "user1", variant.id, 1).await?;
        let placed = create_order_from_cart(&db, "user1", "1 Main St", None).await?;

        crate::core::catalog::apply_variant_update(
            &db,
            variant.id,
            &crate::core::catalog::VariantUpdate {
                price: Some(9999),
                ..Default::default()
            },
        )
        .await?;
        create_active_sale(&db, product.id, 90.0).await?;

        let stored = OrderItem::find_by_id(placed.items[0].id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(stored.price, 1000);

        Ok(())
    }
}
