//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart-to-order scenarios, atomicity, races
//! - `cart_sessions` - Session-keyed cart registry
//! - `registration` - User registration validation and uniqueness
//! - `catalog` - Paged product listing
//!
//! This crate's library is the shared harness: a [`TestShop`] wiring every
//! service to one in-memory store, plus seeding helpers.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Once};

use rust_decimal::Decimal;

use cartwheel_core::{Price, ProductId};
use cartwheel_shop::config::ShopConfig;
use cartwheel_shop::models::{NewOrder, NewProduct, Order, Product, User};
use cartwheel_shop::services::{CatalogService, CheckoutService, RegistrationService};
use cartwheel_shop::sessions::SessionCarts;
use cartwheel_shop::stores::{
    CheckoutTransaction, MemoryStore, Page, PageRequest, StockStore, StoreError, UserStore,
};

/// Everything a scenario test needs, wired to one shared in-memory store.
pub struct TestShop {
    /// The shared store, for direct state assertions.
    pub stores: Arc<MemoryStore>,
    /// Configuration the services were built with.
    pub config: ShopConfig,
    /// Checkout orchestrator.
    pub checkout: CheckoutService<MemoryStore>,
    /// Catalog paging.
    pub catalog: CatalogService<MemoryStore>,
    /// User registration.
    pub registration: RegistrationService<MemoryStore>,
    /// Session cart registry.
    pub sessions: SessionCarts,
}

impl TestShop {
    /// Build a shop with default configuration and an empty store.
    #[must_use]
    pub fn new() -> Self {
        init_tracing();
        let config = ShopConfig::default();
        let stores = Arc::new(MemoryStore::new());
        Self {
            checkout: CheckoutService::new(Arc::clone(&stores), &config),
            catalog: CatalogService::new(Arc::clone(&stores), &config),
            registration: RegistrationService::new(Arc::clone(&stores)),
            sessions: SessionCarts::new(&config),
            stores,
            config,
        }
    }

    /// Seed a catalog product priced in cents.
    pub async fn seed_product(&self, name: &str, price_cents: i64, quantity: u32) -> Product {
        self.stores
            .insert(NewProduct {
                name: name.to_owned(),
                description: format!("{name} for testing"),
                price: Price::new(Decimal::new(price_cents, 2)).expect("seed price is non-negative"),
                quantity,
            })
            .await
            .expect("seeding a product cannot fail")
    }

    /// Seed a registered user.
    pub async fn seed_user(&self, username: &str) -> User {
        let email = cartwheel_core::Email::parse(&format!("{username}@example.com"))
            .expect("seed email is valid");
        self.stores
            .create(&email, username, username)
            .await
            .expect("seeding a user cannot fail")
    }
}

impl Default for TestShop {
    fn default() -> Self {
        Self::new()
    }
}

/// A store wrapper that makes the next `failures` checkout commits lose
/// their optimistic race, then behaves normally. Exercises conflict
/// handling without real thread interleaving.
pub struct ConflictingStore {
    inner: Arc<MemoryStore>,
    failures: AtomicU32,
}

impl ConflictingStore {
    /// Wrap `inner`, injecting `failures` commit conflicts.
    #[must_use]
    pub fn new(inner: Arc<MemoryStore>, failures: u32) -> Self {
        Self {
            inner,
            failures: AtomicU32::new(failures),
        }
    }
}

impl StockStore for ConflictingStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn page(&self, req: PageRequest) -> Result<Page<Product>, StoreError> {
        self.inner.page(req).await
    }

    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError> {
        self.inner.insert(new).await
    }
}

impl CheckoutTransaction for ConflictingStore {
    async fn commit(
        &self,
        order: NewOrder,
        stock_updates: Vec<Product>,
    ) -> Result<Order, StoreError> {
        if self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            let product_id = stock_updates
                .first()
                .map_or_else(|| ProductId::new(0), |update| update.id);
            return Err(StoreError::RevisionConflict { product_id });
        }
        self.inner.commit(order, stock_updates).await
    }
}

/// Initialize the tracing subscriber once for the whole test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
