//! Checkout error types.

use thiserror::Error;

use cartwheel_core::ProductId;

use crate::models::Product;
use crate::stores::StoreError;

/// Errors that can occur during checkout.
///
/// All variants are recoverable at the caller boundary; a failed checkout
/// leaves both the stock store and the ledger exactly as they were.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The ledger is empty; there is nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a product no longer in the stock store.
    #[error("product {id} is no longer available")]
    ProductNotFound {
        /// The product the ledger still references.
        id: ProductId,
    },

    /// Requested quantity exceeds the current authoritative stock.
    #[error("not enough stock for {name}: requested {requested}, available {available}", name = .product.name)]
    InsufficientStock {
        /// The offending product, as read fresh at validation time.
        product: Box<Product>,
        /// Quantity the ledger requested.
        requested: u32,
        /// Quantity actually on hand.
        available: u32,
    },

    /// A concurrent checkout touched the same stock between validation and
    /// commit. Retryable: re-run checkout to validate against fresh stock.
    #[error("checkout conflicted with a concurrent checkout")]
    Conflict,

    /// Store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CheckoutError {
    /// Whether re-running checkout from validation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}
