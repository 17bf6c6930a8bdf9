//! Per-viewer order projections.
//!
//! Pure functions over the order aggregate: the buyer sees the whole order
//! with live action flags; a seller sees only their own lines, a total
//! recomputed over those lines, and no buyer action flags (sellers drive
//! their own transitions, not these).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{
    Order, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineView {
    pub product_id: ProductId,
    pub product_name: String,
    pub seller_id: UserId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    pub order_id: OrderId,
    pub buyer_id: UserId,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: Option<PaymentStatus>,
    pub shipping_address: String,
    pub billing_address: String,
    pub total_amount: Decimal,
    pub cancel_reason: Option<String>,
    pub return_reason: Option<String>,
    pub exchange_reason: Option<String>,
    pub exchange_product_id: Option<ProductId>,
    pub can_cancel: bool,
    pub can_return: bool,
    pub can_exchange: bool,
    pub can_confirm_delivery: bool,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

fn line_view(line: &crate::model::OrderLine) -> OrderLineView {
    OrderLineView {
        product_id: line.product_id.clone(),
        product_name: line.product_name.clone(),
        seller_id: line.seller_id.clone(),
        quantity: line.quantity,
        unit_price: line.unit_price,
        line_total: line.line_total,
    }
}

/// The buyer's view: every line, the stored total, and action flags computed
/// live from the current status.
pub fn buyer_view(order: &Order, payment_status: Option<PaymentStatus>) -> OrderView {
    OrderView {
        order_id: order.id.clone(),
        buyer_id: order.buyer_id.clone(),
        status: order.status,
        payment_method: order.payment_method,
        payment_status,
        shipping_address: order.shipping_address.clone(),
        billing_address: order.billing_address.clone(),
        total_amount: order.total_amount,
        cancel_reason: order.cancel_reason.clone(),
        return_reason: order.return_reason.clone(),
        exchange_reason: order.exchange_reason.clone(),
        exchange_product_id: order.exchange_product_id.clone(),
        can_cancel: order.status.can_cancel(),
        can_return: order.status.can_return(),
        can_exchange: order.status.can_exchange(),
        can_confirm_delivery: order.status.can_confirm_delivery(),
        created_at: order.created_at,
        lines: order.lines.iter().map(line_view).collect(),
    }
}

/// A seller's view: only that seller's lines, the total recomputed over
/// them, and every buyer action flag reported false.
pub fn seller_view(
    order: &Order,
    seller_id: &UserId,
    payment_status: Option<PaymentStatus>,
) -> OrderView {
    let lines: Vec<OrderLineView> = order
        .lines
        .iter()
        .filter(|line| line.seller_id == *seller_id)
        .map(line_view)
        .collect();
    let total_amount = lines.iter().map(|line| line.line_total).sum();

    OrderView {
        order_id: order.id.clone(),
        buyer_id: order.buyer_id.clone(),
        status: order.status,
        payment_method: order.payment_method,
        payment_status,
        shipping_address: order.shipping_address.clone(),
        billing_address: order.billing_address.clone(),
        total_amount,
        cancel_reason: order.cancel_reason.clone(),
        return_reason: order.return_reason.clone(),
        exchange_reason: order.exchange_reason.clone(),
        exchange_product_id: order.exchange_product_id.clone(),
        can_cancel: false,
        can_return: false,
        can_exchange: false,
        can_confirm_delivery: false,
        created_at: order.created_at,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderLine;
    use rust_decimal_macros::dec;

    fn sample_order(status: OrderStatus) -> Order {
        Order {
            id: "ORD-TEST".to_string(),
            buyer_id: "user_1".to_string(),
            status,
            payment_method: PaymentMethod::Card,
            shipping_address: "12 Hill Road".to_string(),
            billing_address: "12 Hill Road".to_string(),
            total_amount: dec!(35.00),
            cancel_reason: None,
            return_reason: None,
            exchange_reason: None,
            exchange_product_id: None,
            created_at: Utc::now(),
            active: true,
            lines: vec![
                OrderLine {
                    product_id: "product_1".to_string(),
                    product_name: "Widget".to_string(),
                    seller_id: "user_2".to_string(),
                    quantity: 2,
                    unit_price: dec!(10.00),
                    line_total: dec!(20.00),
                },
                OrderLine {
                    product_id: "product_2".to_string(),
                    product_name: "Gadget".to_string(),
                    seller_id: "user_3".to_string(),
                    quantity: 1,
                    unit_price: dec!(15.00),
                    line_total: dec!(15.00),
                },
            ],
        }
    }

    #[test]
    fn buyer_flags_track_the_current_status() {
        let view = buyer_view(&sample_order(OrderStatus::Placed), None);
        assert!(view.can_cancel);
        assert!(!view.can_return && !view.can_exchange && !view.can_confirm_delivery);

        let view = buyer_view(&sample_order(OrderStatus::Shipped), None);
        assert!(view.can_confirm_delivery && !view.can_cancel);

        let view = buyer_view(&sample_order(OrderStatus::Delivered), None);
        assert!(view.can_return && view.can_exchange);
        assert!(!view.can_cancel && !view.can_confirm_delivery);
    }

    #[test]
    fn buyer_view_keeps_every_line_and_the_stored_total() {
        let view = buyer_view(&sample_order(OrderStatus::Placed), Some(PaymentStatus::Pending));
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.total_amount, dec!(35.00));
        assert_eq!(view.payment_status, Some(PaymentStatus::Pending));
    }

    #[test]
    fn seller_view_redacts_other_sellers_and_rescopes_the_total() {
        let seller = "user_2".to_string();
        let view = seller_view(&sample_order(OrderStatus::Delivered), &seller, None);
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].product_id, "product_1");
        assert_eq!(view.total_amount, dec!(20.00));
        // Sellers never get the buyer action flags, whatever the status.
        assert!(!view.can_cancel && !view.can_return && !view.can_exchange);
        assert!(!view.can_confirm_delivery);
    }
}
