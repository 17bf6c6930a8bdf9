//! Client for the order actor: the public surface of the order engine.
//!
//! Buyer operations return buyer-scoped views; seller operations return the
//! caller's redacted view. Role, account state, and ownership are all
//! re-validated inside the order actor — this client only shapes requests
//! and projections.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::clients::actor_client::ActorClient;
use crate::clients::{PaymentClient, UserClient};
use crate::error::MarketError;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{
    Order, OrderCreate, OrderId, Payment, PaymentStatus, ProductId, Role, UserId,
};
use crate::order_actor::{OrderAction, OrderActionResult};
use crate::projection::{buyer_view, seller_view, OrderView};

#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    users: UserClient,
    payments: PaymentClient,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>, users: UserClient, payments: PaymentClient) -> Self {
        Self {
            inner,
            users,
            payments,
        }
    }

    /// Convert the buyer's active cart into an order and return the buyer's
    /// view of it.
    #[instrument(skip(self))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<OrderView, MarketError> {
        debug!("Sending place_order to actor");
        let buyer_id = params.buyer_id.clone();
        let order_id = self.inner.create(params).await.map_err(MarketError::from)?;
        self.buyer_order(buyer_id, order_id).await
    }

    /// Settle the order through the mock gateway. Returns the payment record
    /// (which may be `Failed`, leaving the order open for a retry).
    #[instrument(skip(self))]
    pub async fn pay(
        &self,
        order_id: OrderId,
        buyer_id: UserId,
        simulate_failure: bool,
    ) -> Result<Payment, MarketError> {
        let action = OrderAction::Pay {
            buyer_id,
            simulate_failure,
        };
        match self
            .inner
            .perform_action(order_id, action)
            .await
            .map_err(MarketError::from)?
        {
            OrderActionResult::Payment(payment) => Ok(payment),
            other => Err(MarketError::Unavailable(format!(
                "unexpected order action result: {other:?}"
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        order_id: OrderId,
        buyer_id: UserId,
        reason: Option<String>,
    ) -> Result<OrderView, MarketError> {
        let order = self
            .act(order_id, OrderAction::Cancel { buyer_id, reason })
            .await?;
        self.into_buyer_view(order).await
    }

    #[instrument(skip(self))]
    pub async fn request_return(
        &self,
        order_id: OrderId,
        buyer_id: UserId,
        reason: Option<String>,
    ) -> Result<OrderView, MarketError> {
        let order = self
            .act(order_id, OrderAction::RequestReturn { buyer_id, reason })
            .await?;
        self.into_buyer_view(order).await
    }

    #[instrument(skip(self))]
    pub async fn request_exchange(
        &self,
        order_id: OrderId,
        buyer_id: UserId,
        reason: Option<String>,
        target_product_id: Option<ProductId>,
    ) -> Result<OrderView, MarketError> {
        let order = self
            .act(
                order_id,
                OrderAction::RequestExchange {
                    buyer_id,
                    reason,
                    target_product_id,
                },
            )
            .await?;
        self.into_buyer_view(order).await
    }

    #[instrument(skip(self))]
    pub async fn confirm_delivery(
        &self,
        order_id: OrderId,
        buyer_id: UserId,
    ) -> Result<OrderView, MarketError> {
        let order = self
            .act(order_id, OrderAction::ConfirmDelivery { buyer_id })
            .await?;
        self.into_buyer_view(order).await
    }

    #[instrument(skip(self))]
    pub async fn ship(&self, order_id: OrderId, seller_id: UserId) -> Result<OrderView, MarketError> {
        let order = self
            .act(
                order_id,
                OrderAction::Ship {
                    seller_id: seller_id.clone(),
                },
            )
            .await?;
        self.into_seller_view(order, &seller_id).await
    }

    #[instrument(skip(self))]
    pub async fn deliver(
        &self,
        order_id: OrderId,
        seller_id: UserId,
    ) -> Result<OrderView, MarketError> {
        let order = self
            .act(
                order_id,
                OrderAction::Deliver {
                    seller_id: seller_id.clone(),
                },
            )
            .await?;
        self.into_seller_view(order, &seller_id).await
    }

    #[instrument(skip(self))]
    pub async fn complete_return(
        &self,
        order_id: OrderId,
        seller_id: UserId,
    ) -> Result<OrderView, MarketError> {
        let order = self
            .act(
                order_id,
                OrderAction::CompleteReturn {
                    seller_id: seller_id.clone(),
                },
            )
            .await?;
        self.into_seller_view(order, &seller_id).await
    }

    #[instrument(skip(self))]
    pub async fn complete_exchange(
        &self,
        order_id: OrderId,
        seller_id: UserId,
    ) -> Result<OrderView, MarketError> {
        let order = self
            .act(
                order_id,
                OrderAction::CompleteExchange {
                    seller_id: seller_id.clone(),
                },
            )
            .await?;
        self.into_seller_view(order, &seller_id).await
    }

    /// One order, as seen by its buyer. Someone else's order is not found.
    #[instrument(skip(self))]
    pub async fn buyer_order(
        &self,
        buyer_id: UserId,
        order_id: OrderId,
    ) -> Result<OrderView, MarketError> {
        self.ensure_active_role(&buyer_id, Role::Buyer).await?;
        let order = self
            .inner
            .get(order_id.clone())
            .await
            .map_err(MarketError::from)?
            .filter(|order| order.active && order.buyer_id == buyer_id)
            .ok_or_else(|| MarketError::NotFound(format!("order {order_id} not found")))?;
        self.into_buyer_view(order).await
    }

    /// All of a buyer's orders, oldest first.
    #[instrument(skip(self))]
    pub async fn buyer_orders(&self, buyer_id: UserId) -> Result<Vec<OrderView>, MarketError> {
        self.ensure_active_role(&buyer_id, Role::Buyer).await?;
        let mut orders: Vec<Order> = self
            .inner
            .list()
            .await
            .map_err(MarketError::from)?
            .into_iter()
            .filter(|order| order.active && order.buyer_id == buyer_id)
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.into_buyer_view(order).await?);
        }
        Ok(views)
    }

    /// One order, redacted to the calling seller's lines. A seller with no
    /// line on it is forbidden.
    #[instrument(skip(self))]
    pub async fn seller_order(
        &self,
        seller_id: UserId,
        order_id: OrderId,
    ) -> Result<OrderView, MarketError> {
        self.ensure_active_role(&seller_id, Role::Seller).await?;
        let order = self
            .inner
            .get(order_id.clone())
            .await
            .map_err(MarketError::from)?
            .filter(|order| order.active)
            .ok_or_else(|| MarketError::NotFound(format!("order {order_id} not found")))?;
        if !order.lines.iter().any(|line| line.seller_id == seller_id) {
            return Err(MarketError::Forbidden(
                "order does not belong to seller".to_string(),
            ));
        }
        self.into_seller_view(order, &seller_id).await
    }

    /// Every order carrying at least one of the seller's lines, oldest
    /// first, each redacted to that seller.
    #[instrument(skip(self))]
    pub async fn seller_orders(&self, seller_id: UserId) -> Result<Vec<OrderView>, MarketError> {
        self.ensure_active_role(&seller_id, Role::Seller).await?;
        let mut orders: Vec<Order> = self
            .inner
            .list()
            .await
            .map_err(MarketError::from)?
            .into_iter()
            .filter(|order| {
                order.active && order.lines.iter().any(|line| line.seller_id == seller_id)
            })
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.into_seller_view(order, &seller_id).await?);
        }
        Ok(views)
    }

    async fn act(&self, order_id: OrderId, action: OrderAction) -> Result<Order, MarketError> {
        match self
            .inner
            .perform_action(order_id, action)
            .await
            .map_err(MarketError::from)?
        {
            OrderActionResult::Order(order) => Ok(order),
            other => Err(MarketError::Unavailable(format!(
                "unexpected order action result: {other:?}"
            ))),
        }
    }

    async fn ensure_active_role(&self, user_id: &UserId, role: Role) -> Result<(), MarketError> {
        let user = self
            .users
            .get(user_id.clone())
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("user {user_id} not found")))?;
        if !user.is_active_as(role) {
            return Err(MarketError::Forbidden(format!(
                "account {user_id} is inactive or lacks the {role:?} role"
            )));
        }
        Ok(())
    }

    async fn payment_status(&self, order_id: &OrderId) -> Result<Option<PaymentStatus>, MarketError> {
        Ok(self
            .payments
            .by_order(order_id.clone())
            .await?
            .map(|payment| payment.status))
    }

    async fn into_buyer_view(&self, order: Order) -> Result<OrderView, MarketError> {
        let payment_status = self.payment_status(&order.id).await?;
        Ok(buyer_view(&order, payment_status))
    }

    async fn into_seller_view(
        &self,
        order: Order,
        seller_id: &UserId,
    ) -> Result<OrderView, MarketError> {
        let payment_status = self.payment_status(&order.id).await?;
        Ok(seller_view(&order, seller_id, payment_status))
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = MarketError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        MarketError::from(e)
    }
}
