//! The per-session cart ledger.
//!
//! A ledger tracks how many units of each product one session has
//! requested. It is pure bookkeeping: no stock checks, no I/O. Stock is
//! validated once, at checkout, against a fresh read of the stock store -
//! never against the snapshots held here.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::ProductId;

use crate::models::Product;

/// One ledger entry: a product snapshot plus the requested quantity.
///
/// The snapshot is for display and pricing the cart page only; checkout
/// re-reads the authoritative product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product as it looked when first added.
    pub product: Product,
    /// Requested quantity, always >= 1.
    pub quantity: u32,
}

impl CartLine {
    /// Subtotal for this line at the snapshot price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.line_total(self.quantity)
    }
}

/// The product -> requested-quantity mapping for one session.
///
/// Keyed by [`ProductId`], not by the product value, so later price or
/// stock edits to a product cannot corrupt the key.
///
/// Lifecycle: created empty at session start, mutated by
/// [`add_product`](Self::add_product) / [`remove_product`](Self::remove_product),
/// fully cleared on successful checkout or session expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLedger {
    lines: BTreeMap<ProductId, CartLine>,
}

impl CartLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`.
    ///
    /// If the product is already in the ledger the stored quantity is
    /// incremented by 1, keeping the original snapshot; otherwise a new
    /// line is inserted with quantity 1. Repeated calls accumulate.
    pub fn add_product(&mut self, product: &Product) {
        self.lines
            .entry(product.id)
            .and_modify(|line| line.quantity += 1)
            .or_insert_with(|| CartLine {
                product: product.clone(),
                quantity: 1,
            });
    }

    /// Remove one unit of the product with `id`.
    ///
    /// A quantity above 1 is decremented; a quantity of exactly 1 removes
    /// the line entirely. Removing an absent product is a no-op, not an
    /// error.
    pub fn remove_product(&mut self, id: ProductId) {
        if let Some(line) = self.lines.get_mut(&id) {
            if line.quantity > 1 {
                line.quantity -= 1;
            } else {
                self.lines.remove(&id);
            }
        }
    }

    /// Read-only view of the current lines, ordered by product ID.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Requested quantity for `id`, or 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lines.get(&id).map_or(0, |line| line.quantity)
    }

    /// Number of distinct products in the ledger.
    #[must_use]
    pub fn distinct_products(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    /// Whether the ledger holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cart total: sum of unit price x quantity over all lines, in exact
    /// decimal arithmetic. An empty ledger totals exactly zero.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .values()
            .map(CartLine::line_total)
            .sum::<Decimal>()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
