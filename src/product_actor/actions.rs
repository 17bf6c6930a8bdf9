//! Inventory ledger actions and their results.

#[derive(Debug)]
pub enum ProductAction {
    /// Decrement stock by the given quantity, failing if the product is
    /// unavailable or the stock is insufficient.
    Reserve(u32),
    /// Restore stock by the given quantity, re-activating an out-of-stock
    /// product.
    Release(u32),
}

/// Before/after stock levels of a single reserve or release, plus whether
/// this movement crossed the low-stock threshold downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockMovement {
    pub previous: u32,
    pub remaining: u32,
    pub crossed_low_stock: bool,
}

#[derive(Debug)]
pub enum ProductActionResult {
    Reserved(StockMovement),
    Released(StockMovement),
}
