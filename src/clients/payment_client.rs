//! Client for the payment actor.

use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

use crate::error::MarketError;
use crate::model::{OrderId, Payment, PaymentMethod, UserId};
use crate::payment_actor::PaymentRequest;

#[derive(Clone)]
pub struct PaymentClient {
    sender: mpsc::Sender<PaymentRequest>,
}

impl PaymentClient {
    pub fn new(sender: mpsc::Sender<PaymentRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, MarketError>>) -> PaymentRequest,
    ) -> Result<T, MarketError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| MarketError::Unavailable("payment actor closed".to_string()))?;
        response
            .await
            .map_err(|_| MarketError::Unavailable("payment actor dropped response".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn authorize(
        &self,
        order_id: OrderId,
        buyer_id: UserId,
        method: PaymentMethod,
        amount: Decimal,
        simulate_failure: bool,
    ) -> Result<Payment, MarketError> {
        self.request(|respond_to| PaymentRequest::Authorize {
            order_id,
            buyer_id,
            method,
            amount,
            simulate_failure,
            respond_to,
        })
        .await
    }

    /// Settle a pending cash-on-delivery payment. `Ok(false)` means there
    /// was nothing to settle.
    #[instrument(skip(self))]
    pub async fn settle_cod(&self, order_id: OrderId) -> Result<bool, MarketError> {
        self.request(|respond_to| PaymentRequest::SettleCod {
            order_id,
            respond_to,
        })
        .await
    }

    /// Refund a successful payment. `Ok(false)` means the refund was not
    /// applicable.
    #[instrument(skip(self))]
    pub async fn refund(&self, order_id: OrderId) -> Result<bool, MarketError> {
        self.request(|respond_to| PaymentRequest::Refund {
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn by_order(&self, order_id: OrderId) -> Result<Option<Payment>, MarketError> {
        self.request(|respond_to| PaymentRequest::ByOrder {
            order_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn by_buyer(&self, buyer_id: UserId) -> Result<Vec<Payment>, MarketError> {
        self.request(|respond_to| PaymentRequest::ByBuyer {
            buyer_id,
            respond_to,
        })
        .await
    }
}
