//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::{OrderId, Price, ProductId, UserId};

/// A completed order (domain type).
///
/// Created only by a successful checkout; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The user who checked out.
    pub user_id: UserId,
    /// Checkout time.
    pub created_at: DateTime<Utc>,
    /// Total payment: sum of line totals at checkout time.
    pub payment: Decimal,
    /// One line per distinct product checked out.
    pub lines: Vec<Sold>,
}

/// A persisted order line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sold {
    /// The product sold.
    pub product_id: ProductId,
    /// Product name at time of sale.
    pub name: String,
    /// Quantity sold.
    pub quantity: u32,
    /// Unit price at time of sale.
    pub unit_price: Price,
}

/// Input for persisting a new order; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// The user who checked out.
    pub user_id: UserId,
    /// Checkout time.
    pub created_at: DateTime<Utc>,
    /// Total payment.
    pub payment: Decimal,
    /// One line per distinct product.
    pub lines: Vec<Sold>,
}
