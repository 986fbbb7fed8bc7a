//! Session-keyed registry of active cart ledgers.
//!
//! Each shopper session owns exactly one [`CartLedger`]. The registry
//! hands out the ledger for a session at the request boundary; the core
//! services take it as an explicit parameter and never reach into any
//! ambient session state. Idle sessions expire after the configured TTL,
//! which discards the cart - the "session expiry" arm of the ledger
//! lifecycle.

use std::sync::{Arc, Mutex};

use moka::future::Cache;

use cartwheel_core::SessionId;

use crate::config::ShopConfig;
use crate::services::cart::CartLedger;

/// A session's ledger behind a lock; requests for one session are
/// serialized by taking it for the duration of the mutation.
pub type SharedLedger = Arc<Mutex<CartLedger>>;

/// Registry of the cart ledgers for all active sessions.
pub struct SessionCarts {
    carts: Cache<SessionId, SharedLedger>,
}

impl SessionCarts {
    /// Create a registry whose entries expire after the configured idle
    /// TTL.
    #[must_use]
    pub fn new(config: &ShopConfig) -> Self {
        Self {
            carts: Cache::builder()
                .time_to_idle(config.session_ttl)
                .build(),
        }
    }

    /// Get the ledger for `session`, creating an empty one on first
    /// access.
    pub async fn open(&self, session: SessionId) -> SharedLedger {
        self.carts
            .get_with(session, async { Arc::new(Mutex::new(CartLedger::new())) })
            .await
    }

    /// End a session, discarding its cart.
    pub async fn end_session(&self, session: SessionId) {
        self.carts.invalidate(&session).await;
    }

    /// Whether the session currently has a cart.
    #[must_use]
    pub fn contains(&self, session: SessionId) -> bool {
        self.carts.contains_key(&session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use cartwheel_core::{Price, ProductId};

    use super::*;
    use crate::models::Product;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: Price::new(Decimal::new(500, 2)).unwrap(),
            quantity: 10,
            revision: 1,
        }
    }

    #[tokio::test]
    async fn test_open_creates_empty_cart_once() {
        let carts = SessionCarts::new(&ShopConfig::default());
        let session = SessionId::generate();

        let ledger = carts.open(session).await;
        ledger.lock().unwrap().add_product(&product(1));

        // Same session gets the same ledger back.
        let again = carts.open(session).await;
        assert_eq!(again.lock().unwrap().quantity_of(ProductId::new(1)), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let carts = SessionCarts::new(&ShopConfig::default());
        let first = SessionId::generate();
        let second = SessionId::generate();

        carts
            .open(first)
            .await
            .lock()
            .unwrap()
            .add_product(&product(1));

        assert!(carts.open(second).await.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_end_session_discards_cart() {
        let carts = SessionCarts::new(&ShopConfig::default());
        let session = SessionId::generate();

        carts
            .open(session)
            .await
            .lock()
            .unwrap()
            .add_product(&product(1));
        carts.end_session(session).await;

        assert!(!carts.contains(session));
        // Re-opening starts from an empty cart.
        assert!(carts.open(session).await.lock().unwrap().is_empty());
    }
}
