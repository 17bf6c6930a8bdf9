//! System lifecycle: wiring the actors together, running them, and shutting
//! them down.
//!
//! [`OrderSystem`] is the conductor: it creates every actor, injects the
//! order actor's dependencies as its run context (late binding, so no
//! circular references at construction time), and exposes the clients. The
//! dependency graph is acyclic — the order actor calls out to users,
//! inventory, carts, payments, and notifications; nothing calls back into
//! it — so dropping the public clients drains and stops every task.

pub mod order_system;
pub mod tracing;

pub use order_system::*;
pub use self::tracing::*;
