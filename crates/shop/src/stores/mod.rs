//! Store interfaces for stock, orders, and users.
//!
//! The domain services only ever touch persistence through these traits.
//! The bundled [`memory::MemoryStore`] implements all of them behind one
//! lock; a database-backed implementation would map them onto its own
//! transaction machinery.
//!
//! Checkout writes go through [`CheckoutTransaction::commit`], the single
//! atomic boundary spanning the order and stock stores. Everything else is
//! a plain read or an isolated insert.

pub mod memory;

pub use memory::MemoryStore;

use std::future::Future;

use thiserror::Error;

use cartwheel_core::{Email, OrderId, ProductId, UserId};

use crate::models::{NewOrder, NewProduct, Order, Product, User};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A commit carried a product revision older than the stored one.
    /// The commit applied nothing; re-read and retry.
    #[error("stale revision for product {product_id}")]
    RevisionConflict {
        /// The product whose revision was stale.
        product_id: ProductId,
    },

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// A catalog page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Create a page request. Page numbers are 1-based; 0 is treated as 1,
    /// and a zero page size is bumped to 1.
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            per_page: if per_page == 0 { 1 } else { per_page },
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of items before this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        ((self.page - 1) as usize) * (self.per_page as usize)
    }
}

/// One page of results plus the totals callers need to build pagers.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page (may be empty past the last page).
    pub items: Vec<T>,
    /// 1-based page number that was requested.
    pub page: u32,
    /// Page size that was requested.
    pub per_page: u32,
    /// Total items across all pages.
    pub total_items: usize,
    /// Total number of pages (0 when the store is empty).
    pub total_pages: u32,
}

/// Authoritative product catalog with quantity-on-hand and price.
pub trait StockStore: Send + Sync {
    /// Point lookup by product identity.
    fn find_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, StoreError>> + Send;

    /// One page of the catalog, ordered by product ID.
    fn page(
        &self,
        req: PageRequest,
    ) -> impl Future<Output = Result<Page<Product>, StoreError>> + Send;

    /// Add a product to the catalog.
    fn insert(
        &self,
        new: NewProduct,
    ) -> impl Future<Output = Result<Product, StoreError>> + Send;
}

/// The atomic persistence boundary for checkout.
///
/// A commit persists the order and every updated stock row together:
/// either all of it becomes visible or none of it does. Before applying
/// anything, the implementation must check each product's `revision`
/// against the stored one and reject the whole batch with
/// [`StoreError::RevisionConflict`] on any mismatch, so two checkouts
/// racing on the same product cannot both decrement it.
pub trait CheckoutTransaction: Send + Sync {
    /// Atomically persist `order` and `stock_updates`.
    fn commit(
        &self,
        order: NewOrder,
        stock_updates: Vec<Product>,
    ) -> impl Future<Output = Result<Order, StoreError>> + Send;
}

/// Read side of completed orders.
///
/// Orders are only ever written through [`CheckoutTransaction::commit`].
pub trait OrderStore: Send + Sync {
    /// Point lookup by order identity.
    fn get_by_id(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, StoreError>> + Send;

    /// All orders placed by a user, oldest first.
    fn orders_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Order>, StoreError>> + Send;
}

/// Registered users with unique email and username.
pub trait UserStore: Send + Sync {
    /// Look up a user by email.
    fn get_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Look up a user by username.
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Create a new user.
    ///
    /// Fails with [`StoreError::Conflict`] if the email or username is
    /// already registered.
    fn create(
        &self,
        email: &Email,
        username: &str,
        name: &str,
    ) -> impl Future<Output = Result<User, StoreError>> + Send;
}
