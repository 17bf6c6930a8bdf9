//! # Cart Actor
//!
//! Holds every buyer's cart lines. The order engine only reads active lines
//! and deactivates the ones it converts; lines are added (merging on repeat
//! products) and cleared through the buyer-facing cart surface.
//!
//! Cart lines are keyed by buyer rather than by a generated entity id, so
//! this actor carries its own request enum instead of going through the
//! generic CRUD runtime.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::clients::CartClient;
use crate::error::MarketError;
use crate::model::{CartLine, CartLineId, ProductId, UserId};

type Reply<T> = oneshot::Sender<Result<T, MarketError>>;

#[derive(Debug)]
pub enum CartRequest {
    /// Add a line, merging quantities when the buyer already carries the
    /// product.
    AddLine {
        buyer_id: UserId,
        product_id: ProductId,
        quantity: u32,
        respond_to: Reply<CartLineId>,
    },
    /// Active lines for one buyer, in insertion order.
    ActiveLines {
        buyer_id: UserId,
        respond_to: Reply<Vec<CartLine>>,
    },
    /// Deactivate the given lines (used when converting them to an order).
    Deactivate {
        line_ids: Vec<CartLineId>,
        respond_to: Reply<()>,
    },
    /// Deactivate every active line of one buyer.
    Clear {
        buyer_id: UserId,
        respond_to: Reply<()>,
    },
}

pub struct CartActor {
    receiver: mpsc::Receiver<CartRequest>,
    store: HashMap<CartLineId, CartLine>,
    next_id: CartLineId,
}

/// Creates the cart actor and its client.
pub fn new(buffer_size: usize) -> (CartActor, CartClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = CartActor {
        receiver,
        store: HashMap::new(),
        next_id: 1,
    };
    (actor, CartClient::new(sender))
}

impl CartActor {
    pub async fn run(mut self) {
        info!("Cart actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddLine {
                    buyer_id,
                    product_id,
                    quantity,
                    respond_to,
                } => {
                    debug!(%buyer_id, %product_id, quantity, "AddLine");
                    let _ = respond_to.send(self.add_line(buyer_id, product_id, quantity));
                }
                CartRequest::ActiveLines {
                    buyer_id,
                    respond_to,
                } => {
                    let mut lines: Vec<CartLine> = self
                        .store
                        .values()
                        .filter(|line| line.active && line.buyer_id == buyer_id)
                        .cloned()
                        .collect();
                    lines.sort_by_key(|line| line.id);
                    debug!(%buyer_id, count = lines.len(), "ActiveLines");
                    let _ = respond_to.send(Ok(lines));
                }
                CartRequest::Deactivate {
                    line_ids,
                    respond_to,
                } => {
                    debug!(?line_ids, "Deactivate");
                    let _ = respond_to.send(self.deactivate(&line_ids));
                }
                CartRequest::Clear {
                    buyer_id,
                    respond_to,
                } => {
                    debug!(%buyer_id, "Clear");
                    for line in self.store.values_mut() {
                        if line.buyer_id == buyer_id {
                            line.active = false;
                        }
                    }
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(size = self.store.len(), "Cart actor shutdown");
    }

    fn add_line(
        &mut self,
        buyer_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartLineId, MarketError> {
        if quantity == 0 {
            return Err(MarketError::BadRequest(
                "cart quantity must be positive".to_string(),
            ));
        }

        let existing = self
            .store
            .values_mut()
            .find(|line| line.active && line.buyer_id == buyer_id && line.product_id == product_id);
        if let Some(line) = existing {
            line.quantity += quantity;
            return Ok(line.id);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.store.insert(
            id,
            CartLine {
                id,
                buyer_id,
                product_id,
                quantity,
                active: true,
            },
        );
        Ok(id)
    }

    fn deactivate(&mut self, line_ids: &[CartLineId]) -> Result<(), MarketError> {
        for id in line_ids {
            if !self.store.contains_key(id) {
                return Err(MarketError::NotFound(format!("cart line {id} not found")));
            }
        }
        for id in line_ids {
            if let Some(line) = self.store.get_mut(id) {
                line.active = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn() -> CartClient {
        let (actor, client) = new(10);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn repeated_adds_merge_into_one_line() {
        let client = spawn().await;
        let first = client
            .add_line("user_1".to_string(), "product_1".to_string(), 2)
            .await
            .unwrap();
        let second = client
            .add_line("user_1".to_string(), "product_1".to_string(), 3)
            .await
            .unwrap();
        assert_eq!(first, second);

        let lines = client.active_lines("user_1".to_string()).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn deactivated_lines_disappear_from_the_active_view() {
        let client = spawn().await;
        let id = client
            .add_line("user_1".to_string(), "product_1".to_string(), 1)
            .await
            .unwrap();
        client
            .add_line("user_1".to_string(), "product_2".to_string(), 1)
            .await
            .unwrap();

        client.deactivate(vec![id]).await.unwrap();
        let lines = client.active_lines("user_1".to_string()).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, "product_2");
    }

    #[tokio::test]
    async fn carts_are_scoped_per_buyer() {
        let client = spawn().await;
        client
            .add_line("user_1".to_string(), "product_1".to_string(), 1)
            .await
            .unwrap();
        client
            .add_line("user_2".to_string(), "product_1".to_string(), 4)
            .await
            .unwrap();

        client.clear("user_1".to_string()).await.unwrap();
        assert!(client
            .active_lines("user_1".to_string())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            client.active_lines("user_2".to_string()).await.unwrap()[0].quantity,
            4
        );
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let client = spawn().await;
        let err = client
            .add_line("user_1".to_string(), "product_1".to_string(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::BadRequest(_)));
    }
}
