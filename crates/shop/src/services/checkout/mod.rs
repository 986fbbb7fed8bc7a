//! Checkout orchestration.
//!
//! Converts a session's cart ledger into a persisted order while
//! reconciling authoritative stock:
//!
//! 1. Re-fetch every ledger line's product from the stock store - the
//!    cart-add-time snapshot is never trusted.
//! 2. Validate requested quantity against the fresh quantity-on-hand.
//! 3. Compute the decrements, the payment total, and the sold lines on
//!    local copies only.
//! 4. Persist order + decrements through one atomic commit.
//! 5. Clear the ledger, only after the commit succeeded.
//!
//! Any failure before the commit returns with shared state untouched; a
//! lost optimistic race surfaces as the retryable [`CheckoutError::Conflict`].

mod error;

pub use error::CheckoutError;

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use cartwheel_core::UserId;

use crate::config::ShopConfig;
use crate::models::{NewOrder, Order, Sold};
use crate::services::cart::CartLedger;
use crate::stores::{CheckoutTransaction, StockStore, StoreError};

/// Orchestrates cart checkout against the stock and order stores.
pub struct CheckoutService<S> {
    stores: Arc<S>,
    max_attempts: u32,
}

impl<S> CheckoutService<S>
where
    S: StockStore + CheckoutTransaction,
{
    /// Create a new checkout service.
    #[must_use]
    pub fn new(stores: Arc<S>, config: &ShopConfig) -> Self {
        Self {
            stores,
            max_attempts: config.checkout_max_attempts.max(1),
        }
    }

    /// Run one checkout attempt for `user_id`'s ledger.
    ///
    /// On success the ledger is cleared and the persisted order returned.
    /// On any error the ledger and the stock store are unchanged.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] if the ledger holds no lines.
    /// - [`CheckoutError::ProductNotFound`] if a line's product vanished.
    /// - [`CheckoutError::InsufficientStock`] if a line requests more than
    ///   the current quantity-on-hand.
    /// - [`CheckoutError::Conflict`] if a concurrent checkout invalidated
    ///   the stock read between validation and commit (retryable).
    #[instrument(skip(self, ledger), fields(lines = ledger.distinct_products()))]
    pub async fn checkout(
        &self,
        ledger: &mut CartLedger,
        user_id: UserId,
    ) -> Result<Order, CheckoutError> {
        if ledger.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut stock_updates = Vec::with_capacity(ledger.distinct_products());
        let mut lines = Vec::with_capacity(ledger.distinct_products());
        let mut payment = Decimal::ZERO;

        for line in ledger.lines() {
            let requested = line.quantity;
            let fresh = self
                .stores
                .find_by_id(line.product.id)
                .await?
                .ok_or(CheckoutError::ProductNotFound {
                    id: line.product.id,
                })?;

            if fresh.quantity < requested {
                warn!(
                    product_id = %fresh.id,
                    requested,
                    available = fresh.quantity,
                    "checkout aborted: insufficient stock"
                );
                return Err(CheckoutError::InsufficientStock {
                    requested,
                    available: fresh.quantity,
                    product: Box::new(fresh),
                });
            }

            payment += fresh.price.line_total(requested);
            lines.push(Sold {
                product_id: fresh.id,
                name: fresh.name.clone(),
                quantity: requested,
                unit_price: fresh.price,
            });

            let mut update = fresh;
            update.quantity -= requested;
            stock_updates.push(update);
        }

        let order = NewOrder {
            user_id,
            created_at: Utc::now(),
            payment,
            lines,
        };

        let persisted = match self.stores.commit(order, stock_updates).await {
            Ok(order) => order,
            Err(StoreError::RevisionConflict { product_id }) => {
                debug!(%product_id, "commit lost an optimistic race");
                return Err(CheckoutError::Conflict);
            }
            Err(err) => return Err(err.into()),
        };

        ledger.clear();
        info!(
            order_id = %persisted.id,
            payment = %persisted.payment,
            "checkout complete"
        );
        Ok(persisted)
    }

    /// Checkout with bounded retries on concurrency conflicts.
    ///
    /// Each retry re-runs the full validation against fresh stock. Any
    /// non-retryable error, and a conflict on the final attempt, are
    /// returned as-is.
    ///
    /// # Errors
    ///
    /// Same as [`checkout`](Self::checkout).
    pub async fn checkout_with_retry(
        &self,
        ledger: &mut CartLedger,
        user_id: UserId,
    ) -> Result<Order, CheckoutError> {
        let mut attempt = 1;
        loop {
            match self.checkout(ledger, user_id).await {
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    warn!(attempt, "checkout conflicted; revalidating against fresh stock");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
