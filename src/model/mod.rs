//! Domain model: aggregates, value objects, and the Create/Update payloads
//! their actors accept.

pub mod cart;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

pub use cart::*;
pub use notification::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use user::*;
