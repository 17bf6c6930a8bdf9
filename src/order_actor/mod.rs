//! # Order Actor — the state machine
//!
//! Owns every order and drives it through its lifecycle:
//!
//! ```text
//! PLACED -> CONFIRMED -> SHIPPED -> DELIVERED
//!    \          \                      |-> RETURN_REQUESTED  -> RETURNED
//!     \          \                     \-> EXCHANGE_REQUESTED -> EXCHANGED
//!      \-> CANCELLED <-/
//! ```
//!
//! Placement runs in the entity's `on_create` hook; every other transition is
//! an [`OrderAction`]. Both execute start-to-finish inside this actor's
//! mailbox turn, so concurrent calls against one order serialize and the
//! loser observes the new status and fails `InvalidState`. Side effects on
//! other actors (inventory, payments, carts) are issued before the order
//! mutates; notification fan-out runs after and never fails a transition.

pub mod actions;
pub mod entity;

pub use actions::*;
pub use entity::OrderContext;

use uuid::Uuid;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Order;

/// Creates the order actor and its raw client; the lifecycle layer wraps the
/// client with [`OrderClient`](crate::clients::OrderClient).
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size, next_order_number)
}

fn next_order_number() -> String {
    let token = Uuid::new_v4().simple().to_string()[..12].to_uppercase();
    format!("ORD-{token}")
}
