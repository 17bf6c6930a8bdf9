//! [`ActorEntity`] implementation for [`Order`]: placement in `on_create`,
//! transitions in `handle_action`.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::warn;

use crate::clients::{
    ActorClient, CartClient, NotificationClient, PaymentClient, ProductClient, UserClient,
};
use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::framework::ActorEntity;
use crate::model::{
    seller_shares, NotificationKind, Order, OrderCreate, OrderLine, OrderStatus, PaymentMethod,
    PaymentStatus, ProductId, ReferenceKind, Role, UserId,
};

use super::actions::{OrderAction, OrderActionResult};

/// Dependencies injected into the order actor at spawn time.
pub struct OrderContext {
    pub users: UserClient,
    pub inventory: ProductClient,
    pub carts: CartClient,
    pub payments: PaymentClient,
    pub notifications: NotificationClient,
    pub config: MarketConfig,
}

#[async_trait]
impl ActorEntity for Order {
    type Id = String;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = MarketError;

    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            buyer_id: params.buyer_id,
            status: OrderStatus::Placed,
            payment_method: params.payment_method,
            shipping_address: params.shipping_address,
            billing_address: params.billing_address,
            total_amount: Decimal::ZERO,
            cancel_reason: None,
            return_reason: None,
            exchange_reason: None,
            exchange_product_id: None,
            created_at: Utc::now(),
            active: true,
            lines: Vec::new(),
        })
    }

    /// Order placement. Everything here happens before the order is inserted
    /// into the store: a failure discards the order, and any stock already
    /// reserved for earlier lines is released again, so a rejected placement
    /// leaves no trace.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        let buyer = ctx
            .users
            .get(self.buyer_id.clone())
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("user {} not found", self.buyer_id)))?;
        if !buyer.is_active_as(Role::Buyer) {
            return Err(MarketError::Forbidden(
                "only an active buyer can place orders".to_string(),
            ));
        }

        let cart_lines = ctx.carts.active_lines(self.buyer_id.clone()).await?;
        if cart_lines.is_empty() {
            return Err(MarketError::BadRequest("cart is empty".to_string()));
        }

        let mut reserved: Vec<(ProductId, u32)> = Vec::new();
        let mut lines: Vec<OrderLine> = Vec::with_capacity(cart_lines.len());
        let mut low_stock: Vec<(UserId, ProductId, String, u32)> = Vec::new();

        for cart_line in &cart_lines {
            let product = match ctx.inventory.get(cart_line.product_id.clone()).await {
                Ok(Some(product)) => product,
                Ok(None) => {
                    release_reserved(&reserved, ctx).await;
                    return Err(MarketError::NotFound(format!(
                        "product {} not found",
                        cart_line.product_id
                    )));
                }
                Err(err) => {
                    release_reserved(&reserved, ctx).await;
                    return Err(err);
                }
            };
            if !product.available() {
                release_reserved(&reserved, ctx).await;
                return Err(MarketError::BadRequest(format!(
                    "product is not available: {}",
                    product.name
                )));
            }

            let movement = match ctx
                .inventory
                .reserve(product.id.clone(), cart_line.quantity)
                .await
            {
                Ok(movement) => movement,
                Err(err) => {
                    release_reserved(&reserved, ctx).await;
                    return Err(err);
                }
            };
            reserved.push((product.id.clone(), cart_line.quantity));

            // Price is captured here; later catalog edits do not reprice
            // the line.
            let line_total = product.price * Decimal::from(cart_line.quantity);
            lines.push(OrderLine {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                seller_id: product.seller_id.clone(),
                quantity: cart_line.quantity,
                unit_price: product.price,
                line_total,
            });
            if movement.crossed_low_stock {
                low_stock.push((
                    product.seller_id,
                    product.id,
                    product.name,
                    movement.remaining,
                ));
            }
        }

        let consumed: Vec<_> = cart_lines.iter().map(|line| line.id).collect();
        if let Err(err) = ctx.carts.deactivate(consumed).await {
            release_reserved(&reserved, ctx).await;
            return Err(err);
        }

        self.total_amount = lines.iter().map(|line| line.line_total).sum();
        self.lines = lines;

        // The placement is committed from here on; notifications are
        // fire-and-forget.
        for (seller_id, product_id, name, remaining) in low_stock {
            self.notify(
                ctx,
                &seller_id,
                NotificationKind::LowStockAlert,
                "Low stock alert",
                format!("Product '{name}' is low on stock. Current stock: {remaining}."),
                ReferenceKind::Product,
                product_id,
            )
            .await;
        }

        let buyer_id = self.buyer_id.clone();
        self.notify_order(
            ctx,
            &buyer_id,
            NotificationKind::OrderPlaced,
            "Order placed successfully",
            format!("Your order {} has been placed.", self.id),
        )
        .await;
        for share in seller_shares(&self.lines) {
            self.notify_order(
                ctx,
                &share.seller_id,
                NotificationKind::OrderReceived,
                "New order received",
                format!(
                    "Order {} from {} | Items: {} | Amount: {}",
                    self.id,
                    buyer.email,
                    share.item_count,
                    share.amount.round_dp(2)
                ),
            )
            .await;
        }

        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &OrderContext) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::Pay {
                buyer_id,
                simulate_failure,
            } => {
                self.guard_buyer(&buyer_id, ctx).await?;
                if !self.status.can_pay() {
                    return Err(MarketError::InvalidState {
                        action: "pay for",
                        status: self.status,
                    });
                }

                let payment = ctx
                    .payments
                    .authorize(
                        self.id.clone(),
                        buyer_id,
                        self.payment_method,
                        self.total_amount,
                        simulate_failure,
                    )
                    .await?;
                if matches!(
                    payment.status,
                    PaymentStatus::Success | PaymentStatus::Pending
                ) {
                    self.status = OrderStatus::Confirmed;
                }
                Ok(OrderActionResult::Payment(payment))
            }

            OrderAction::Cancel { buyer_id, reason } => {
                self.guard_buyer(&buyer_id, ctx).await?;
                if !self.status.can_cancel() {
                    return Err(MarketError::InvalidState {
                        action: "cancel",
                        status: self.status,
                    });
                }

                self.release_lines(ctx).await?;
                self.status = OrderStatus::Cancelled;
                self.set_reason(ReasonField::Cancel, reason, "Cancelled by buyer", ctx);

                let reason_text = self.cancel_reason.clone().unwrap_or_else(|| "-".to_string());
                self.notify_order(
                    ctx,
                    &buyer_id,
                    NotificationKind::OrderCancelled,
                    "Order cancelled",
                    format!("Order {} has been cancelled. Reason: {reason_text}", self.id),
                )
                .await;
                for seller_id in self.seller_ids() {
                    self.notify_order(
                        ctx,
                        &seller_id,
                        NotificationKind::OrderCancelled,
                        "Buyer cancelled order",
                        format!("Order {} was cancelled by buyer.", self.id),
                    )
                    .await;
                }
                Ok(OrderActionResult::Order(self.clone()))
            }

            OrderAction::RequestReturn { buyer_id, reason } => {
                self.guard_buyer(&buyer_id, ctx).await?;
                if !self.status.can_return() {
                    return Err(MarketError::InvalidState {
                        action: "request a return on",
                        status: self.status,
                    });
                }

                self.status = OrderStatus::ReturnRequested;
                self.set_reason(ReasonField::Return, reason, "Return requested by buyer", ctx);

                let reason_text = self.return_reason.clone().unwrap_or_else(|| "-".to_string());
                self.notify_order(
                    ctx,
                    &buyer_id,
                    NotificationKind::ReturnRequested,
                    "Return requested",
                    format!(
                        "Return request submitted for order {}. Reason: {reason_text}",
                        self.id
                    ),
                )
                .await;
                for seller_id in self.seller_ids() {
                    self.notify_order(
                        ctx,
                        &seller_id,
                        NotificationKind::ReturnRequested,
                        "Return request received",
                        format!("Buyer requested return for order {}.", self.id),
                    )
                    .await;
                }
                Ok(OrderActionResult::Order(self.clone()))
            }

            OrderAction::RequestExchange {
                buyer_id,
                reason,
                target_product_id,
            } => {
                self.guard_buyer(&buyer_id, ctx).await?;
                if !self.status.can_exchange() {
                    return Err(MarketError::InvalidState {
                        action: "request an exchange on",
                        status: self.status,
                    });
                }
                if let Some(target) = &target_product_id {
                    validate_exchange_target(target, ctx).await?;
                }

                self.status = OrderStatus::ExchangeRequested;
                self.set_reason(
                    ReasonField::Exchange,
                    reason,
                    "Exchange requested by buyer",
                    ctx,
                );
                self.exchange_product_id = target_product_id;

                let reason_text = self
                    .exchange_reason
                    .clone()
                    .unwrap_or_else(|| "-".to_string());
                self.notify_order(
                    ctx,
                    &buyer_id,
                    NotificationKind::ExchangeRequested,
                    "Exchange requested",
                    format!(
                        "Exchange request submitted for order {}. Reason: {reason_text}",
                        self.id
                    ),
                )
                .await;
                for seller_id in self.seller_ids() {
                    self.notify_order(
                        ctx,
                        &seller_id,
                        NotificationKind::ExchangeRequested,
                        "Exchange request received",
                        format!("Buyer requested exchange for order {}.", self.id),
                    )
                    .await;
                }
                Ok(OrderActionResult::Order(self.clone()))
            }

            OrderAction::ConfirmDelivery { buyer_id } => {
                self.guard_buyer(&buyer_id, ctx).await?;
                if !self.status.can_confirm_delivery() {
                    return Err(MarketError::InvalidState {
                        action: "confirm delivery of",
                        status: self.status,
                    });
                }
                self.deliver(ctx, true).await?;
                Ok(OrderActionResult::Order(self.clone()))
            }

            OrderAction::Ship { seller_id } => {
                self.guard_seller(&seller_id, ctx).await?;
                if self.status != OrderStatus::Confirmed {
                    return Err(MarketError::InvalidState {
                        action: "ship",
                        status: self.status,
                    });
                }

                self.status = OrderStatus::Shipped;

                let buyer_id = self.buyer_id.clone();
                self.notify_order(
                    ctx,
                    &buyer_id,
                    NotificationKind::OrderShipped,
                    "Order shipped",
                    format!("Your order {} has been shipped.", self.id),
                )
                .await;
                let cod_note = if self.payment_method == PaymentMethod::CashOnDelivery {
                    " COD payment is pending until delivery confirmation."
                } else {
                    ""
                };
                for seller in self.seller_ids() {
                    self.notify_order(
                        ctx,
                        &seller,
                        NotificationKind::OrderShipped,
                        "Order marked as shipped",
                        format!("Order {} is now marked as shipped.{cod_note}", self.id),
                    )
                    .await;
                }
                Ok(OrderActionResult::Order(self.clone()))
            }

            OrderAction::Deliver { seller_id } => {
                self.guard_seller(&seller_id, ctx).await?;
                if self.status != OrderStatus::Shipped {
                    return Err(MarketError::InvalidState {
                        action: "deliver",
                        status: self.status,
                    });
                }
                self.deliver(ctx, false).await?;
                Ok(OrderActionResult::Order(self.clone()))
            }

            OrderAction::CompleteReturn { seller_id } => {
                self.guard_seller(&seller_id, ctx).await?;
                if self.status != OrderStatus::ReturnRequested {
                    return Err(MarketError::InvalidState {
                        action: "complete a return on",
                        status: self.status,
                    });
                }

                self.release_lines(ctx).await?;
                let refunded = ctx.payments.refund(self.id.clone()).await?;
                self.status = OrderStatus::Returned;

                let buyer_note = if refunded {
                    " Payment has been refunded to buyer."
                } else {
                    " Payment refund is not applicable for this order."
                };
                let buyer_id = self.buyer_id.clone();
                self.notify_order(
                    ctx,
                    &buyer_id,
                    NotificationKind::ReturnCompleted,
                    "Return completed",
                    format!(
                        "Return for order {} has been completed.{buyer_note}",
                        self.id
                    ),
                )
                .await;
                let seller_note = if refunded {
                    " Payment has been refunded to buyer."
                } else {
                    " No payment refund was required."
                };
                for seller in self.seller_ids() {
                    self.notify_order(
                        ctx,
                        &seller,
                        NotificationKind::ReturnCompleted,
                        "Return completed",
                        format!(
                            "Return for order {} has been completed.{seller_note}",
                            self.id
                        ),
                    )
                    .await;
                }
                Ok(OrderActionResult::Order(self.clone()))
            }

            OrderAction::CompleteExchange { seller_id } => {
                self.guard_seller(&seller_id, ctx).await?;
                if self.status != OrderStatus::ExchangeRequested {
                    return Err(MarketError::InvalidState {
                        action: "complete an exchange on",
                        status: self.status,
                    });
                }
                // The target can drift out of stock between request and
                // completion; it is re-checked, not trusted.
                if let Some(target) = self.exchange_product_id.clone() {
                    validate_exchange_target(&target, ctx).await?;
                }

                self.status = OrderStatus::Exchanged;

                let buyer_id = self.buyer_id.clone();
                self.notify_order(
                    ctx,
                    &buyer_id,
                    NotificationKind::ExchangeCompleted,
                    "Exchange completed",
                    format!("Exchange for order {} has been completed.", self.id),
                )
                .await;
                for seller in self.seller_ids() {
                    self.notify_order(
                        ctx,
                        &seller,
                        NotificationKind::ExchangeCompleted,
                        "Exchange completed",
                        format!("Exchange for order {} has been completed.", self.id),
                    )
                    .await;
                }
                Ok(OrderActionResult::Order(self.clone()))
            }
        }
    }
}

enum ReasonField {
    Cancel,
    Return,
    Exchange,
}

impl Order {
    /// Buyer guards: role and account state per the user service contract
    /// (Forbidden), then visibility — someone else's or an inactive order is
    /// simply not found.
    async fn guard_buyer(&self, buyer_id: &UserId, ctx: &OrderContext) -> Result<(), MarketError> {
        let user = ctx
            .users
            .get(buyer_id.clone())
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("user {buyer_id} not found")))?;
        if !user.is_active_as(Role::Buyer) {
            return Err(MarketError::Forbidden(
                "buyer account is inactive or lacks the buyer role".to_string(),
            ));
        }
        if self.buyer_id != *buyer_id || !self.active {
            return Err(MarketError::NotFound(format!("order {} not found", self.id)));
        }
        Ok(())
    }

    /// Seller guards: role and account state, then ownership of at least one
    /// line — each contributing seller of a multi-seller order qualifies.
    async fn guard_seller(
        &self,
        seller_id: &UserId,
        ctx: &OrderContext,
    ) -> Result<(), MarketError> {
        let user = ctx
            .users
            .get(seller_id.clone())
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("user {seller_id} not found")))?;
        if !user.is_active_as(Role::Seller) {
            return Err(MarketError::Forbidden(
                "seller account is inactive or lacks the seller role".to_string(),
            ));
        }
        if !self.lines.iter().any(|line| line.seller_id == *seller_id) {
            return Err(MarketError::Forbidden(
                "order does not belong to seller".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets one reason field and clears the other two; cancel, return, and
    /// exchange annotations are mutually exclusive.
    fn set_reason(
        &mut self,
        field: ReasonField,
        reason: Option<String>,
        fallback: &str,
        ctx: &OrderContext,
    ) {
        let text = normalized_reason(reason, fallback, ctx.config.max_reason_len);
        self.cancel_reason = None;
        self.return_reason = None;
        self.exchange_reason = None;
        self.exchange_product_id = None;
        match field {
            ReasonField::Cancel => self.cancel_reason = Some(text),
            ReasonField::Return => self.return_reason = Some(text),
            ReasonField::Exchange => self.exchange_reason = Some(text),
        }
    }

    /// Restores stock for every line, reversing the placement decrement.
    async fn release_lines(&self, ctx: &OrderContext) -> Result<(), MarketError> {
        for line in &self.lines {
            ctx.inventory
                .release(line.product_id.clone(), line.quantity)
                .await?;
        }
        Ok(())
    }

    /// Shared `SHIPPED -> DELIVERED` tail for the seller and buyer paths.
    async fn deliver(
        &mut self,
        ctx: &OrderContext,
        confirmed_by_buyer: bool,
    ) -> Result<(), MarketError> {
        let collected = if self.payment_method == PaymentMethod::CashOnDelivery {
            ctx.payments.settle_cod(self.id.clone()).await?
        } else {
            false
        };
        self.status = OrderStatus::Delivered;

        let buyer_title = if confirmed_by_buyer {
            "Delivery confirmed"
        } else {
            "Order delivered"
        };
        let buyer_body = if confirmed_by_buyer {
            format!("You confirmed delivery for order {}.", self.id)
        } else {
            format!("Your order {} has been delivered.", self.id)
        };
        let buyer_id = self.buyer_id.clone();
        self.notify_order(
            ctx,
            &buyer_id,
            NotificationKind::OrderDelivered,
            buyer_title,
            buyer_body,
        )
        .await;

        let cod_note = if self.payment_method == PaymentMethod::CashOnDelivery {
            let settled = collected
                || matches!(
                    ctx.payments
                        .by_order(self.id.clone())
                        .await
                        .ok()
                        .flatten()
                        .map(|payment| payment.status),
                    Some(PaymentStatus::Success)
                );
            if settled {
                " COD payment has been collected."
            } else {
                " COD payment is pending."
            }
        } else {
            ""
        };
        let seller_title = if confirmed_by_buyer {
            "Buyer confirmed delivery"
        } else {
            "Order marked as delivered"
        };
        let seller_body = if confirmed_by_buyer {
            format!("Buyer confirmed delivery for order {}.{cod_note}", self.id)
        } else {
            format!("Order {} is now marked as delivered.{cod_note}", self.id)
        };
        for seller in self.seller_ids() {
            self.notify_order(
                ctx,
                &seller,
                NotificationKind::OrderDelivered,
                seller_title,
                seller_body.clone(),
            )
            .await;
        }
        Ok(())
    }

    async fn notify_order(
        &self,
        ctx: &OrderContext,
        recipient: &UserId,
        kind: NotificationKind,
        title: &str,
        body: String,
    ) {
        self.notify(
            ctx,
            recipient,
            kind,
            title,
            body,
            ReferenceKind::Order,
            self.id.clone(),
        )
        .await;
    }

    /// Fire-and-forget: a failed send is logged and swallowed so it can
    /// never undo the transition that produced it.
    #[allow(clippy::too_many_arguments)]
    async fn notify(
        &self,
        ctx: &OrderContext,
        recipient: &UserId,
        kind: NotificationKind,
        title: &str,
        body: String,
        reference_kind: ReferenceKind,
        reference_id: String,
    ) {
        if let Err(err) = ctx
            .notifications
            .notify(
                recipient.clone(),
                kind,
                title.to_string(),
                body,
                reference_kind,
                reference_id,
            )
            .await
        {
            warn!(order_id = %self.id, %recipient, error = %err, "notification dispatch failed");
        }
    }
}

/// Releases the stock already reserved by a placement that is being
/// abandoned. Failures are logged; they only occur while the system is
/// tearing down.
async fn release_reserved(reserved: &[(ProductId, u32)], ctx: &OrderContext) {
    for (product_id, quantity) in reserved {
        if let Err(err) = ctx.inventory.release(product_id.clone(), *quantity).await {
            warn!(%product_id, error = %err, "failed to release reserved stock");
        }
    }
}

async fn validate_exchange_target(
    target: &ProductId,
    ctx: &OrderContext,
) -> Result<(), MarketError> {
    let product = ctx
        .inventory
        .get(target.clone())
        .await?
        .ok_or_else(|| MarketError::NotFound("exchange target product not found".to_string()))?;
    if !product.available() {
        return Err(MarketError::BadRequest(
            "exchange target product is not active".to_string(),
        ));
    }
    if product.stock == 0 {
        return Err(MarketError::BadRequest(
            "exchange target product is out of stock".to_string(),
        ));
    }
    Ok(())
}

fn normalized_reason(reason: Option<String>, fallback: &str, max_len: usize) -> String {
    let trimmed = reason.as_deref().map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    trimmed.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_reasons_fall_back_to_the_role_default() {
        assert_eq!(
            normalized_reason(None, "Cancelled by buyer", 500),
            "Cancelled by buyer"
        );
        assert_eq!(
            normalized_reason(Some("   ".to_string()), "Cancelled by buyer", 500),
            "Cancelled by buyer"
        );
    }

    #[test]
    fn reasons_are_trimmed_and_capped() {
        assert_eq!(
            normalized_reason(Some("  wrong size  ".to_string()), "x", 500),
            "wrong size"
        );
        let long = "a".repeat(600);
        assert_eq!(normalized_reason(Some(long), "x", 500).len(), 500);
    }
}
