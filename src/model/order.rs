//! The order aggregate: header, owned lines, and the status predicates the
//! state machine and projections share.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::PaymentMethod;
use super::product::ProductId;
use super::user::UserId;

/// Order number (`ORD-` + 12 uppercase hex characters).
pub type OrderId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    ReturnRequested,
    Returned,
    ExchangeRequested,
    Exchanged,
}

impl OrderStatus {
    pub fn can_pay(self) -> bool {
        matches!(self, OrderStatus::Placed | OrderStatus::Confirmed)
    }

    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Placed | OrderStatus::Confirmed)
    }

    pub fn can_return(self) -> bool {
        self == OrderStatus::Delivered
    }

    pub fn can_exchange(self) -> bool {
        self == OrderStatus::Delivered
    }

    pub fn can_confirm_delivery(self) -> bool {
        self == OrderStatus::Shipped
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Cancelled | OrderStatus::Returned | OrderStatus::Exchanged
        )
    }
}

/// One line of an order: a product snapshot, the contributing seller, and
/// the price captured at purchase time. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub seller_id: UserId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// The order aggregate. `total_amount` is fixed at creation (the sum of the
/// line totals) and never recomputed; seller-scoped totals are derived
/// per view. At most one of the three reason fields is set at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer_id: UserId,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
    pub billing_address: String,
    pub total_amount: Decimal,
    pub cancel_reason: Option<String>,
    pub return_reason: Option<String>,
    pub exchange_reason: Option<String>,
    pub exchange_product_id: Option<ProductId>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Distinct sellers contributing to this order, in first-seen line order.
    pub fn seller_ids(&self) -> Vec<UserId> {
        let mut sellers: Vec<UserId> = Vec::new();
        for line in &self.lines {
            if !sellers.contains(&line.seller_id) {
                sellers.push(line.seller_id.clone());
            }
        }
        sellers
    }
}

/// Payload for placing an order. The lines come from the buyer's active
/// cart, not from the caller.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub buyer_id: UserId,
    pub payment_method: PaymentMethod,
    pub shipping_address: String,
    pub billing_address: String,
}

/// Per-seller aggregate of an order's lines, used for notification fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerShare {
    pub seller_id: UserId,
    pub item_count: u32,
    pub amount: Decimal,
}

/// Groups order lines by seller, preserving first-seen order. One entry per
/// distinct seller regardless of how many lines they contributed.
pub fn seller_shares(lines: &[OrderLine]) -> Vec<SellerShare> {
    let mut shares: Vec<SellerShare> = Vec::new();
    for line in lines {
        match shares.iter_mut().find(|s| s.seller_id == line.seller_id) {
            Some(share) => {
                share.item_count += line.quantity;
                share.amount += line.line_total;
            }
            None => shares.push(SellerShare {
                seller_id: line.seller_id.clone(),
                item_count: line.quantity,
                amount: line.line_total,
            }),
        }
    }
    shares
}
