//! Product domain types.

use serde::{Deserialize, Serialize};

use cartwheel_core::{Price, ProductId};

/// A catalog product (domain type).
///
/// The stock store owns the authoritative quantity-on-hand; cart lines hold
/// copies of this type for display and pricing only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Quantity on hand.
    pub quantity: u32,
    /// Store revision, bumped on every committed write. A checkout commit
    /// carrying a stale revision is rejected as a whole.
    pub revision: u64,
}

/// Input for adding a product to the catalog.
///
/// The store assigns the ID and initial revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Initial quantity on hand.
    pub quantity: u32,
}
