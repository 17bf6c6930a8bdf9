//! Client for the cart actor.

use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

use crate::cart_actor::CartRequest;
use crate::error::MarketError;
use crate::model::{CartLine, CartLineId, ProductId, UserId};

#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, MarketError>>) -> CartRequest,
    ) -> Result<T, MarketError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| MarketError::Unavailable("cart actor closed".to_string()))?;
        response
            .await
            .map_err(|_| MarketError::Unavailable("cart actor dropped response".to_string()))?
    }

    #[instrument(skip(self))]
    pub async fn add_line(
        &self,
        buyer_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartLineId, MarketError> {
        self.request(|respond_to| CartRequest::AddLine {
            buyer_id,
            product_id,
            quantity,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn active_lines(&self, buyer_id: UserId) -> Result<Vec<CartLine>, MarketError> {
        self.request(|respond_to| CartRequest::ActiveLines {
            buyer_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, line_ids: Vec<CartLineId>) -> Result<(), MarketError> {
        self.request(|respond_to| CartRequest::Deactivate {
            line_ids,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn clear(&self, buyer_id: UserId) -> Result<(), MarketError> {
        self.request(|respond_to| CartRequest::Clear {
            buyer_id,
            respond_to,
        })
        .await
    }
}
