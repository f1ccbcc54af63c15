//! Unified error type for the commerce engine.
//!
//! Every fallible operation returns [`Result`]. Variants carry enough context to build a
//! user-facing message, while storage failures hide the underlying `DbErr` text behind a
//! generic message (it stays available through `source()`).

use thiserror::Error;

/// Coarse classification of an [`Error`], used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced entity does not exist
    NotFound,
    /// A required field is missing or malformed
    InvalidInput,
    /// The operation does not apply to the entity's current state
    Conflict,
    /// A business rule rejected the request (margin, empty cart, empty import)
    BusinessRule,
    /// The store failed unexpectedly
    Unavailable,
}

/// Errors produced by the commerce engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Product variant does not exist
    #[error("Product variant not found: {id}")]
    VariantNotFound {
        /// Requested variant id
        id: i64,
    },

    /// Product does not exist
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: i64,
    },

    /// Supplier does not exist
    #[error("Supplier not found: {id}")]
    SupplierNotFound {
        /// Requested supplier id
        id: i64,
    },

    /// Order does not exist
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// Cart item does not exist or belongs to another user
    #[error("Cart item not found: {id}")]
    CartItemNotFound {
        /// Requested cart item id
        id: i64,
    },

    /// Purchase order does not exist
    #[error("Purchase order not found: {id}")]
    PurchaseOrderNotFound {
        /// Requested purchase order id
        id: i64,
    },

    /// Sale does not exist
    #[error("Sale not found: {id}")]
    SaleNotFound {
        /// Requested sale id
        id: i64,
    },

    /// Malformed or missing input field
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// Checkout was attempted with no cart items
    #[error("Cart is empty")]
    EmptyCart,

    /// An inventory import produced no usable rows for a product
    #[error("Nothing to import for product {product_id}")]
    EmptyImport {
        /// Target product id (0 when no product could be resolved)
        product_id: i64,
    },

    /// Operation is not allowed in the entity's current state
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Why the transition was refused
        message: String,
    },

    /// Status value is not a member of the order status set
    #[error("Invalid order status: {status}")]
    InvalidStatus {
        /// The rejected value
        status: String,
    },

    /// Quantity must be strictly positive
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// Price is missing, negative or not a finite number
    #[error("Invalid price: {message}")]
    InvalidPrice {
        /// Which price was rejected and why
        message: String,
    },

    /// Cost price must be strictly lower than selling price
    #[error("Cost price {cost_price} must be lower than selling price {selling_price}")]
    MarginInvalid {
        /// Rejected cost price
        cost_price: i64,
        /// Rejected selling price
        selling_price: i64,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Details about the failure
        message: String,
    },

    /// Underlying store failure
    #[error("Storage unavailable")]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    /// Maps the error onto the coarse [`ErrorKind`] taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::VariantNotFound { .. }
            | Self::ProductNotFound { .. }
            | Self::SupplierNotFound { .. }
            | Self::OrderNotFound { .. }
            | Self::CartItemNotFound { .. }
            | Self::PurchaseOrderNotFound { .. }
            | Self::SaleNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidInput { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidQuantity { .. }
            | Self::InvalidPrice { .. } => ErrorKind::InvalidInput,
            Self::InvalidState { .. } => ErrorKind::Conflict,
            Self::EmptyCart | Self::EmptyImport { .. } | Self::MarginInvalid { .. } => {
                ErrorKind::BusinessRule
            }
            Self::Config { .. } | Self::Database(_) => ErrorKind::Unavailable,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
