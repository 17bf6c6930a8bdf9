//! Client for the product actor (the inventory ledger surface).

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::clients::actor_client::ActorClient;
use crate::error::MarketError;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, StockMovement};

#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, MarketError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(MarketError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, MarketError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(MarketError::from)
    }

    /// Atomically decrement stock, failing `BadRequest` when the product is
    /// unavailable or the stock is insufficient.
    #[instrument(skip(self))]
    pub async fn reserve(&self, id: ProductId, quantity: u32) -> Result<StockMovement, MarketError> {
        debug!("Reserving {} units of {}", quantity, id);
        match self
            .inner
            .perform_action(id, ProductAction::Reserve(quantity))
            .await
            .map_err(MarketError::from)?
        {
            ProductActionResult::Reserved(movement) => Ok(movement),
            other => Err(MarketError::Unavailable(format!(
                "unexpected inventory action result: {other:?}"
            ))),
        }
    }

    /// Restore stock, re-activating an out-of-stock product.
    #[instrument(skip(self))]
    pub async fn release(&self, id: ProductId, quantity: u32) -> Result<StockMovement, MarketError> {
        debug!("Releasing {} units of {}", quantity, id);
        match self
            .inner
            .perform_action(id, ProductAction::Release(quantity))
            .await
            .map_err(MarketError::from)?
        {
            ProductActionResult::Released(movement) => Ok(movement),
            other => Err(MarketError::Unavailable(format!(
                "unexpected inventory action result: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = MarketError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        MarketError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action};

    #[tokio::test]
    async fn reserve_unwraps_the_stock_movement() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let reserve_task = tokio::spawn(async move {
            product_client.reserve("product_1".to_string(), 5).await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("expected Action request");
        assert_eq!(id, "product_1");
        match action {
            ProductAction::Reserve(quantity) => assert_eq!(quantity, 5),
            other => panic!("expected Reserve, got {other:?}"),
        }
        responder
            .send(Ok(ProductActionResult::Reserved(StockMovement {
                previous: 10,
                remaining: 5,
                crossed_low_stock: true,
            })))
            .unwrap();

        let movement = reserve_task.await.unwrap().unwrap();
        assert_eq!(movement.remaining, 5);
        assert!(movement.crossed_low_stock);
    }

    #[tokio::test]
    async fn reserve_surfaces_domain_errors() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let reserve_task = tokio::spawn(async move {
            product_client.reserve("product_1".to_string(), 100).await
        });

        let (_, _, responder) = expect_action(&mut receiver)
            .await
            .expect("expected Action request");
        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                MarketError::BadRequest("insufficient stock for product: Widget".to_string()),
            ))))
            .unwrap();

        let err = reserve_task.await.unwrap().unwrap_err();
        assert!(matches!(err, MarketError::BadRequest(_)));
    }
}
