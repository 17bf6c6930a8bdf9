//! # Payment Actor — mock settlement
//!
//! Keeps the one-payment-per-order ledger and implements the mock gateway:
//! authorization, cash-on-delivery settlement at delivery time, and refunds.
//! No real gateway is involved; outcomes are decided by the payment method
//! and the caller's `simulate_failure` flag.
//!
//! Payments are keyed by order id and created lazily on the first
//! authorization, so this actor carries its own request enum instead of the
//! generic CRUD runtime.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clients::PaymentClient;
use crate::error::MarketError;
use crate::model::{OrderId, Payment, PaymentMethod, PaymentStatus, UserId};

type Reply<T> = oneshot::Sender<Result<T, MarketError>>;

#[derive(Debug)]
pub enum PaymentRequest {
    /// Create or retry the payment for an order. Fails `Conflict` when a
    /// `Success`/`Pending` payment already exists (no double charging).
    Authorize {
        order_id: OrderId,
        buyer_id: UserId,
        method: PaymentMethod,
        amount: Decimal,
        simulate_failure: bool,
        respond_to: Reply<Payment>,
    },
    /// Flip a pending cash-on-delivery payment to `Success`. Idempotent:
    /// replies `false` when there is nothing to settle.
    SettleCod {
        order_id: OrderId,
        respond_to: Reply<bool>,
    },
    /// Refund a successful payment. Idempotent: replies `false` when the
    /// refund is not applicable, never an error.
    Refund {
        order_id: OrderId,
        respond_to: Reply<bool>,
    },
    ByOrder {
        order_id: OrderId,
        respond_to: Reply<Option<Payment>>,
    },
    ByBuyer {
        buyer_id: UserId,
        respond_to: Reply<Vec<Payment>>,
    },
}

pub struct PaymentActor {
    receiver: mpsc::Receiver<PaymentRequest>,
    store: HashMap<OrderId, Payment>,
}

/// Creates the payment actor and its client.
pub fn new(buffer_size: usize) -> (PaymentActor, PaymentClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = PaymentActor {
        receiver,
        store: HashMap::new(),
    };
    (actor, PaymentClient::new(sender))
}

fn transaction_ref() -> String {
    let token = Uuid::new_v4().simple().to_string()[..12].to_uppercase();
    format!("PAY-{token}")
}

fn mock_status(method: PaymentMethod, simulate_failure: bool) -> PaymentStatus {
    if method == PaymentMethod::CashOnDelivery {
        return PaymentStatus::Pending;
    }
    if simulate_failure {
        PaymentStatus::Failed
    } else {
        PaymentStatus::Success
    }
}

fn gateway_response(method: PaymentMethod, status: PaymentStatus) -> String {
    if method == PaymentMethod::CashOnDelivery {
        return "Mock COD selected. Payment pending until delivery.".to_string();
    }
    match status {
        PaymentStatus::Success => "Mock payment authorized successfully.".to_string(),
        _ => "Mock gateway declined transaction.".to_string(),
    }
}

impl PaymentActor {
    pub async fn run(mut self) {
        info!("Payment actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                PaymentRequest::Authorize {
                    order_id,
                    buyer_id,
                    method,
                    amount,
                    simulate_failure,
                    respond_to,
                } => {
                    debug!(%order_id, ?method, %amount, simulate_failure, "Authorize");
                    let _ = respond_to.send(self.authorize(
                        order_id,
                        buyer_id,
                        method,
                        amount,
                        simulate_failure,
                    ));
                }
                PaymentRequest::SettleCod {
                    order_id,
                    respond_to,
                } => {
                    debug!(%order_id, "SettleCod");
                    let _ = respond_to.send(Ok(self.settle_cod(&order_id)));
                }
                PaymentRequest::Refund {
                    order_id,
                    respond_to,
                } => {
                    debug!(%order_id, "Refund");
                    let _ = respond_to.send(Ok(self.refund(&order_id)));
                }
                PaymentRequest::ByOrder {
                    order_id,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.store.get(&order_id).cloned()));
                }
                PaymentRequest::ByBuyer {
                    buyer_id,
                    respond_to,
                } => {
                    let mut payments: Vec<Payment> = self
                        .store
                        .values()
                        .filter(|payment| payment.buyer_id == buyer_id)
                        .cloned()
                        .collect();
                    payments.sort_by(|a, b| a.processed_at.cmp(&b.processed_at));
                    let _ = respond_to.send(Ok(payments));
                }
            }
        }

        info!(size = self.store.len(), "Payment actor shutdown");
    }

    fn authorize(
        &mut self,
        order_id: OrderId,
        buyer_id: UserId,
        method: PaymentMethod,
        amount: Decimal,
        simulate_failure: bool,
    ) -> Result<Payment, MarketError> {
        if let Some(existing) = self.store.get(&order_id) {
            if matches!(
                existing.status,
                PaymentStatus::Success | PaymentStatus::Pending
            ) {
                return Err(MarketError::Conflict(
                    "payment already processed for this order".to_string(),
                ));
            }
        }

        let status = mock_status(method, simulate_failure);
        let payment = Payment {
            order_id: order_id.clone(),
            buyer_id,
            method,
            status,
            amount,
            transaction_ref: transaction_ref(),
            gateway_response: gateway_response(method, status),
            processed_at: Utc::now(),
        };
        self.store.insert(order_id, payment.clone());
        Ok(payment)
    }

    fn settle_cod(&mut self, order_id: &OrderId) -> bool {
        match self.store.get_mut(order_id) {
            Some(payment)
                if payment.method == PaymentMethod::CashOnDelivery
                    && payment.status == PaymentStatus::Pending =>
            {
                payment.status = PaymentStatus::Success;
                payment.processed_at = Utc::now();
                payment.gateway_response = "Mock COD payment collected on delivery.".to_string();
                true
            }
            _ => false,
        }
    }

    fn refund(&mut self, order_id: &OrderId) -> bool {
        match self.store.get_mut(order_id) {
            Some(payment) if payment.status == PaymentStatus::Success => {
                payment.status = PaymentStatus::Refunded;
                payment.processed_at = Utc::now();
                payment.gateway_response =
                    "Mock refund processed to buyer after return completion.".to_string();
                true
            }
            _ => false,
        }
    }
}
