//! In-memory store backing all store traits.
//!
//! One `RwLock` guards the whole store, so a checkout commit is a single
//! critical section: revision checks, stock updates, and the order append
//! all happen under one write guard. Readers observe either the full
//! pre-commit state or the full post-commit state, never a partial
//! decrement. No guard is ever held across an await.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use cartwheel_core::{Email, OrderId, ProductId, UserId};

use super::{
    CheckoutTransaction, OrderStore, Page, PageRequest, StockStore, StoreError, UserStore,
};
use crate::models::{NewOrder, NewProduct, Order, Product, User};

/// In-memory implementation of the stock, order, and user stores.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    users: BTreeMap<UserId, User>,
    next_product_id: i32,
    next_order_id: i32,
    next_user_id: i32,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::DataCorruption("store lock poisoned".to_owned()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::DataCorruption("store lock poisoned".to_owned()))
    }
}

impl StockStore for MemoryStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn page(&self, req: PageRequest) -> Result<Page<Product>, StoreError> {
        let inner = self.read()?;
        let total_items = inner.products.len();
        let per_page = req.per_page() as usize;
        let total_pages = u32::try_from(total_items.div_ceil(per_page))
            .map_err(|_| StoreError::DataCorruption("page count overflow".to_owned()))?;
        let items: Vec<Product> = inner
            .products
            .values()
            .skip(req.offset())
            .take(per_page)
            .cloned()
            .collect();

        Ok(Page {
            items,
            page: req.page(),
            per_page: req.per_page(),
            total_items,
            total_pages,
        })
    }

    async fn insert(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut inner = self.write()?;
        inner.next_product_id += 1;
        let product = Product {
            id: ProductId::new(inner.next_product_id),
            name: new.name,
            description: new.description,
            price: new.price,
            quantity: new.quantity,
            revision: 1,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }
}

impl CheckoutTransaction for MemoryStore {
    async fn commit(
        &self,
        order: NewOrder,
        stock_updates: Vec<Product>,
    ) -> Result<Order, StoreError> {
        let mut inner = self.write()?;

        // Validate every revision before touching anything, so a stale
        // update rejects the whole batch with the store unchanged.
        for update in &stock_updates {
            let current = inner
                .products
                .get(&update.id)
                .ok_or(StoreError::NotFound)?;
            if current.revision != update.revision {
                return Err(StoreError::RevisionConflict {
                    product_id: update.id,
                });
            }
        }

        for mut update in stock_updates {
            update.revision += 1;
            inner.products.insert(update.id, update);
        }

        inner.next_order_id += 1;
        let persisted = Order {
            id: OrderId::new(inner.next_order_id),
            user_id: order.user_id,
            created_at: order.created_at,
            payment: order.payment,
            lines: order.lines,
        };
        inner.orders.insert(persisted.id, persisted.clone());
        Ok(persisted)
    }
}

impl OrderStore for MemoryStore {
    async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.read()?.orders.get(&id).cloned())
    }

    async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .read()?
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl UserStore for MemoryStore {
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create(&self, email: &Email, username: &str, name: &str) -> Result<User, StoreError> {
        let mut inner = self.write()?;
        if inner.users.values().any(|user| user.email == *email) {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }
        if inner.users.values().any(|user| user.username == username) {
            return Err(StoreError::Conflict("username already exists".to_owned()));
        }

        inner.next_user_id += 1;
        let user = User {
            id: UserId::new(inner.next_user_id),
            email: email.clone(),
            username: username.to_owned(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}
