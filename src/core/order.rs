//! Order lifecycle - Status handling and lookups for placed orders.
//!
//! Status changes are plain assignments within the fixed status set; the engine does not
//! enforce a forward-only machine. The one guarded transition is cancellation, which only
//! applies to orders that are still `pending`.

use crate::{
    core::current_timestamp,
    entities::{Order, OrderItem, order, order_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{info, instrument, warn};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting payment
    Pending,
    /// Payment received
    Paid,
    /// Handed to the carrier
    Shipped,
    /// Delivered
    Completed,
    /// Cancelled before payment
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Paid,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The value stored in the `orders.status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| Error::InvalidStatus {
                status: value.to_string(),
            })
    }
}

/// An order together with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWithItems {
    /// The order header
    pub order: order::Model,
    /// The order lines, in insertion order
    pub items: Vec<order_item::Model>,
}

impl OrderWithItems {
    /// Parsed status of the order.
    ///
    /// # Errors
    /// Returns [`Error::InvalidStatus`] if the stored value is not a known status.
    pub fn status(&self) -> Result<OrderStatus> {
        self.order.status.parse()
    }
}

/// Retrieves an order by ID.
pub async fn get_order_by_id<C>(db: &C, order_id: i64) -> Result<Option<order::Model>>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an order and its lines.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] when the order does not exist.
pub async fn get_order_with_items<C>(db: &C, order_id: i64) -> Result<OrderWithItems>
where
    C: ConnectionTrait,
{
    let order = get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;
    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await?;
    Ok(OrderWithItems { order, items })
}

/// Lists a user's orders, newest first.
pub async fn list_orders_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Overwrites the status of an order with any member of the status set.
///
/// # Errors
/// Returns [`Error::InvalidStatus`] for an unknown status and [`Error::OrderNotFound`] when
/// the order does not exist.
#[instrument(skip(db))]
pub async fn update_order_status<C>(db: &C, order_id: i64, status: &str) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    let status: OrderStatus = status.parse()?;

    let mut order: order::ActiveModel = get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?
        .into();
    order.status = Set(status.as_str().to_string());
    order.updated_at = Set(current_timestamp());
    let order = order.update(db).await?;

    info!("Order {} status set to {}", order.id, status);
    Ok(order)
}

/// Cancels a pending order.
///
/// The status check and the write are one conditional UPDATE, so a concurrent payment
/// cannot be overwritten.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] when the order does not exist and
/// [`Error::InvalidState`] when it is not pending.
#[instrument(skip(db))]
pub async fn cancel_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    let result = Order::update_many()
        .col_expr(
            order::Column::Status,
            Expr::value(OrderStatus::Cancelled.as_str()),
        )
        .col_expr(order::Column::UpdatedAt, Expr::value(current_timestamp()))
        .filter(order::Column::Id.eq(order_id))
        .filter(order::Column::Status.eq(OrderStatus::Pending.as_str()))
        .exec(db)
        .await?;

    let order = get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if result.rows_affected == 0 {
        warn!(
            "Refused to cancel order {} in status {}",
            order_id, order.status
        );
        return Err(Error::InvalidState {
            message: "only pending orders can be cancelled".to_string(),
        });
    }

    info!("Order {} cancelled", order_id);
    Ok(order)
}
