//! Order transitions and their results.
//!
//! Every action carries the id of the authenticated user driving it; the
//! entity re-validates role, account state, and ownership before touching
//! the order.

use crate::model::{Order, Payment, ProductId, UserId};

#[derive(Debug)]
pub enum OrderAction {
    /// Buyer settles the order through the mock gateway. Legal from
    /// `Placed`/`Confirmed`; a failed authorization leaves the order
    /// `Placed` so the buyer can retry.
    Pay {
        buyer_id: UserId,
        simulate_failure: bool,
    },
    /// Buyer cancels. Legal from `Placed`/`Confirmed`; restores stock.
    Cancel {
        buyer_id: UserId,
        reason: Option<String>,
    },
    /// Buyer requests a return of a delivered order. No stock effect yet.
    RequestReturn {
        buyer_id: UserId,
        reason: Option<String>,
    },
    /// Buyer requests an exchange of a delivered order, optionally naming a
    /// replacement product (which must be active and in stock).
    RequestExchange {
        buyer_id: UserId,
        reason: Option<String>,
        target_product_id: Option<ProductId>,
    },
    /// Buyer confirms delivery of a shipped order; settles a pending COD
    /// payment.
    ConfirmDelivery { buyer_id: UserId },
    /// Seller ships a confirmed order.
    Ship { seller_id: UserId },
    /// Seller marks a shipped order delivered; settles a pending COD
    /// payment. Converges on the same state as `ConfirmDelivery`.
    Deliver { seller_id: UserId },
    /// Seller completes a requested return: stock restored, successful
    /// payment refunded.
    CompleteReturn { seller_id: UserId },
    /// Seller completes a requested exchange; the target product is
    /// re-validated because it can drift out of stock after the request.
    CompleteExchange { seller_id: UserId },
}

#[derive(Debug)]
pub enum OrderActionResult {
    Order(Order),
    Payment(Payment),
}
