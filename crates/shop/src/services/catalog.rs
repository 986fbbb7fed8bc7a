//! Catalog browsing.
//!
//! Paged product listing over the stock store. Page arithmetic only -
//! rendering a pager is the presentation layer's problem.

use std::sync::Arc;

use tracing::instrument;

use crate::config::ShopConfig;
use crate::models::Product;
use crate::stores::{Page, PageRequest, StockStore, StoreError};

/// Paged access to the product catalog.
pub struct CatalogService<S> {
    stores: Arc<S>,
    page_size: u32,
}

impl<S> CatalogService<S>
where
    S: StockStore,
{
    /// Create a new catalog service.
    #[must_use]
    pub fn new(stores: Arc<S>, config: &ShopConfig) -> Self {
        Self {
            stores,
            page_size: config.catalog_page_size,
        }
    }

    /// One page of the catalog. Page numbers are 1-based; page 0 is
    /// treated as page 1, and pages past the end return empty items with
    /// the totals intact.
    ///
    /// # Errors
    ///
    /// Propagates any [`StoreError`] from the stock store.
    #[instrument(skip(self))]
    pub async fn products_page(&self, page: u32) -> Result<Page<Product>, StoreError> {
        self.stores
            .page(PageRequest::new(page, self.page_size))
            .await
    }
}
