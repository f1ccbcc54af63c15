//! Core business logic - framework-agnostic commerce operations.
//!
//! The transactional engine lives here: price resolution, the cart ledger, checkout,
//! order status handling, spreadsheet inventory import and supplier purchase orders.
//! Supporting modules manage the catalog, sales and suppliers those engines read.

/// Shopping cart ledger with price snapshots
pub mod cart;
/// Products and variants, including partial variant updates
pub mod catalog;
/// Atomic cart to order conversion
pub mod checkout;
/// Spreadsheet row ingestion into variant stock
pub mod inventory_import;
/// Order status transitions and lookups
pub mod order;
/// Effective price computation
pub mod pricing;
/// Supplier restocking with audit trail
pub mod purchase_order;
/// Time-bounded promotional discounts
pub mod sale;
/// Supplier registry
pub mod supplier;

use chrono::{DateTime, SubsecRound, Utc};

/// Current instant truncated to whole seconds, the precision every timestamp is stored at.
pub(crate) fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
