use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::clients::{
    CartClient, NotificationClient, OrderClient, PaymentClient, ProductClient, UserClient,
};
use crate::config::MarketConfig;
use crate::order_actor::OrderContext;
use crate::{cart_actor, notification_actor, order_actor, payment_actor, product_actor, user_actor};

/// The running engine: all actors spawned and wired, clients ready.
pub struct OrderSystem {
    /// Client for the order actor — the engine's public surface.
    pub order_client: OrderClient,
    /// Client for the user actor.
    pub user_client: UserClient,
    /// Client for the product actor (inventory ledger).
    pub product_client: ProductClient,
    /// Client for the cart actor.
    pub cart_client: CartClient,
    /// Client for the payment actor.
    pub payment_client: PaymentClient,
    /// Client for the notification actor.
    pub notification_client: NotificationClient,
    /// Task handles for all running actors, joined on shutdown.
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Creates and starts the whole system.
    pub fn new(config: MarketConfig) -> Self {
        let capacity = config.channel_capacity;

        let (user_actor, user_client) = user_actor::new(capacity);
        let user_handle = tokio::spawn(user_actor.run(()));

        let (product_actor, product_client) = product_actor::new(capacity);
        let product_handle = tokio::spawn(product_actor.run(config.inventory()));

        let (cart_actor, cart_client) = cart_actor::new(capacity);
        let cart_handle = tokio::spawn(cart_actor.run());

        let (payment_actor, payment_client) = payment_actor::new(capacity);
        let payment_handle = tokio::spawn(payment_actor.run());

        let (notification_actor, notification_client) = notification_actor::new(capacity);
        let notification_handle = tokio::spawn(notification_actor.run());

        // The order actor depends on everything above; its clients are
        // injected as the run context.
        let (order_actor, order_resource_client) = order_actor::new(capacity);
        let order_client = OrderClient::new(
            order_resource_client,
            user_client.clone(),
            payment_client.clone(),
        );
        let context = OrderContext {
            users: user_client.clone(),
            inventory: product_client.clone(),
            carts: cart_client.clone(),
            payments: payment_client.clone(),
            notifications: notification_client.clone(),
            config,
        };
        let order_handle = tokio::spawn(order_actor.run(context));

        Self {
            order_client,
            user_client,
            product_client,
            cart_client,
            payment_client,
            notification_client,
            handles: vec![
                user_handle,
                product_handle,
                cart_handle,
                payment_handle,
                notification_handle,
                order_handle,
            ],
        }
    }

    /// Gracefully shuts down the system: drops every client (closing the
    /// channels), then waits for the actor tasks to drain and exit.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.user_client);
        drop(self.product_client);
        drop(self.cart_client);
        drop(self.payment_client);
        drop(self.notification_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {e:?}"));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for OrderSystem {
    fn default() -> Self {
        Self::new(MarketConfig::default())
    }
}
