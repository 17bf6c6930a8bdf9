//! [`ActorEntity`] implementation for [`Product`].

use async_trait::async_trait;

use crate::config::InventoryConfig;
use crate::error::MarketError;
use crate::framework::ActorEntity;
use crate::model::{Product, ProductCreate, ProductStatus, ProductUpdate};

use super::actions::{ProductAction, ProductActionResult, StockMovement};

#[async_trait]
impl ActorEntity for Product {
    type Id = String;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = InventoryConfig;
    type Error = MarketError;

    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, Self::Error> {
        let status = if params.stock > 0 {
            ProductStatus::Active
        } else {
            ProductStatus::OutOfStock
        };
        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            stock: params.stock,
            in_stock: params.stock > 0,
            status,
            low_stock_threshold: params.low_stock_threshold,
            seller_id: params.seller_id,
            active: true,
        })
    }

    async fn on_update(
        &mut self,
        update: ProductUpdate,
        _ctx: &InventoryConfig,
    ) -> Result<(), Self::Error> {
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
            self.in_stock = stock > 0;
            if stock == 0 {
                self.status = ProductStatus::OutOfStock;
            } else if self.status == ProductStatus::OutOfStock {
                self.status = ProductStatus::Active;
            }
        }
        if let Some(threshold) = update.low_stock_threshold {
            self.low_stock_threshold = Some(threshold);
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        ctx: &InventoryConfig,
    ) -> Result<ProductActionResult, Self::Error> {
        match action {
            ProductAction::Reserve(quantity) => {
                if quantity == 0 {
                    return Err(MarketError::BadRequest(
                        "reserve quantity must be positive".to_string(),
                    ));
                }
                if !self.available() {
                    return Err(MarketError::BadRequest(format!(
                        "product is not available: {}",
                        self.name
                    )));
                }
                if self.stock < quantity {
                    return Err(MarketError::BadRequest(format!(
                        "insufficient stock for product: {}",
                        self.name
                    )));
                }

                let previous = self.stock;
                self.stock -= quantity;
                self.in_stock = self.stock > 0;
                if self.stock == 0 {
                    self.status = ProductStatus::OutOfStock;
                }

                // One alert per downward crossing, not one per unit sold.
                let threshold = self
                    .low_stock_threshold
                    .unwrap_or(ctx.default_low_stock_threshold);
                let crossed_low_stock = previous > threshold && self.stock <= threshold;

                Ok(ProductActionResult::Reserved(StockMovement {
                    previous,
                    remaining: self.stock,
                    crossed_low_stock,
                }))
            }
            ProductAction::Release(quantity) => {
                let previous = self.stock;
                self.stock += quantity;
                self.in_stock = self.stock > 0;
                if self.stock > 0 && self.status == ProductStatus::OutOfStock {
                    self.status = ProductStatus::Active;
                }

                Ok(ProductActionResult::Released(StockMovement {
                    previous,
                    remaining: self.stock,
                    crossed_low_stock: false,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::ResourceActor;
    use rust_decimal_macros::dec;

    fn test_config() -> InventoryConfig {
        InventoryConfig {
            default_low_stock_threshold: 5,
        }
    }

    fn widget(stock: u32, threshold: Option<u32>) -> ProductCreate {
        ProductCreate {
            name: "Widget".to_string(),
            price: dec!(25.50),
            stock,
            seller_id: "user_1".to_string(),
            low_stock_threshold: threshold,
        }
    }

    async fn spawn() -> crate::framework::ResourceClient<Product> {
        let (actor, client) = ResourceActor::<Product>::new(10, || "product_1".to_string());
        tokio::spawn(actor.run(test_config()));
        client
    }

    #[tokio::test]
    async fn reserve_then_release_round_trips_stock() {
        let client = spawn().await;
        let id = client.create(widget(10, None)).await.unwrap();

        client
            .perform_action(id.clone(), ProductAction::Reserve(4))
            .await
            .unwrap();
        client
            .perform_action(id.clone(), ProductAction::Release(4))
            .await
            .unwrap();

        let product = client.get(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);
        assert!(product.in_stock);
        assert_eq!(product.status, ProductStatus::Active);
    }

    #[tokio::test]
    async fn reserving_the_last_unit_flips_out_of_stock_and_release_reactivates() {
        let client = spawn().await;
        let id = client.create(widget(2, None)).await.unwrap();

        client
            .perform_action(id.clone(), ProductAction::Reserve(2))
            .await
            .unwrap();
        let product = client.get(id.clone()).await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
        assert!(!product.in_stock);
        assert_eq!(product.status, ProductStatus::OutOfStock);

        client
            .perform_action(id.clone(), ProductAction::Release(2))
            .await
            .unwrap();
        let product = client.get(id).await.unwrap().unwrap();
        assert_eq!(product.status, ProductStatus::Active);
        assert!(product.in_stock);
    }

    #[tokio::test]
    async fn over_reserving_fails_and_leaves_stock_untouched() {
        let client = spawn().await;
        let id = client.create(widget(3, None)).await.unwrap();

        let err = client
            .perform_action(id.clone(), ProductAction::Reserve(4))
            .await
            .unwrap_err();
        let err = MarketError::from(err);
        assert!(matches!(err, MarketError::BadRequest(_)));

        let product = client.get(id).await.unwrap().unwrap();
        assert_eq!(product.stock, 3);
    }

    #[tokio::test]
    async fn threshold_crossing_fires_once() {
        let client = spawn().await;
        // Threshold 5, stock 6: the first reservation crosses, later ones
        // stay below and must not re-flag.
        let id = client.create(widget(6, Some(5))).await.unwrap();

        let first = client
            .perform_action(id.clone(), ProductAction::Reserve(2))
            .await
            .unwrap();
        match first {
            ProductActionResult::Reserved(movement) => {
                assert!(movement.crossed_low_stock);
                assert_eq!(movement.previous, 6);
                assert_eq!(movement.remaining, 4);
            }
            other => panic!("expected Reserved, got {other:?}"),
        }

        let second = client
            .perform_action(id, ProductAction::Reserve(1))
            .await
            .unwrap();
        match second {
            ProductActionResult::Reserved(movement) => assert!(!movement.crossed_low_stock),
            other => panic!("expected Reserved, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn default_threshold_comes_from_context() {
        let client = spawn().await;
        // No per-product threshold: the context default of 5 applies.
        let id = client.create(widget(6, None)).await.unwrap();

        let result = client
            .perform_action(id, ProductAction::Reserve(1))
            .await
            .unwrap();
        match result {
            ProductActionResult::Reserved(movement) => assert!(movement.crossed_low_stock),
            other => panic!("expected Reserved, got {other:?}"),
        }
    }
}
