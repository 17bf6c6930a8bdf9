use serde::{Deserialize, Serialize};

use super::product::ProductId;
use super::user::UserId;

/// Identifier for cart lines.
pub type CartLineId = u64;

/// One line of a buyer's cart. Lines converted into an order are
/// deactivated, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub buyer_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub active: bool,
}
