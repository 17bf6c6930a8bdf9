use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Identifier for products (`product_N`).
pub type ProductId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    OutOfStock,
    Discontinued,
}

/// A catalog entry with its inventory counters.
///
/// `stock` is the single mutable counter the ledger guards; `in_stock` and
/// `status` are derived from it whenever it moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub in_stock: bool,
    pub status: ProductStatus,
    /// Per-product alert threshold; `None` falls back to the configured
    /// system default.
    pub low_stock_threshold: Option<u32>,
    pub seller_id: UserId,
    pub active: bool,
}

impl Product {
    /// Whether the product can currently be purchased or targeted by an
    /// exchange (stock permitting).
    pub fn available(&self) -> bool {
        self.active && self.status != ProductStatus::Discontinued
    }
}

/// Payload for creating a new product.
///
/// `low_stock_threshold` defaults from the inventory configuration when not
/// provided.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub seller_id: UserId,
    pub low_stock_threshold: Option<u32>,
}

/// Payload for updating an existing product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub low_stock_threshold: Option<u32>,
    pub active: Option<bool>,
}
