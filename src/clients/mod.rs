//! Type-safe client wrappers around the actors.
//!
//! [`OrderClient`] is the public surface of the engine; the rest exist for
//! seeding data, collaborator reads, and the order actor's own side effects.

pub mod actor_client;
pub mod cart_client;
pub mod notification_client;
pub mod order_client;
pub mod payment_client;
pub mod product_client;
pub mod user_client;

pub use actor_client::ActorClient;
pub use cart_client::CartClient;
pub use notification_client::NotificationClient;
pub use order_client::OrderClient;
pub use payment_client::PaymentClient;
pub use product_client::ProductClient;
pub use user_client::UserClient;
