//! # orderflow
//!
//! A multi-seller marketplace order engine built as a Tokio actor system.
//! Buyers turn carts into orders, pay through a mock gateway, and request
//! returns or exchanges; sellers ship, deliver, and complete them; the
//! engine keeps inventory consistent and fans out notifications to every
//! involved party.
//!
//! ## Core modules
//!
//! - [`framework`]: the generic actor runtime ([`ResourceActor`](framework::ResourceActor),
//!   [`ActorEntity`](framework::ActorEntity), [`ResourceClient`](framework::ResourceClient)).
//! - [`model`]: the domain aggregates (`Order`, `Product`, `Payment`, ...).
//! - [`order_actor`]: the order state machine — placement plus nine guarded
//!   transitions with inventory, payment, and notification side effects.
//! - [`product_actor`]: the inventory ledger (atomic reserve/release with
//!   low-stock detection).
//! - [`payment_actor`], [`cart_actor`], [`notification_actor`]: collaborator
//!   services with their own mailboxes.
//! - [`clients`]: type-safe wrappers; [`clients::OrderClient`] is the public
//!   surface.
//! - [`projection`]: buyer- and seller-scoped order views.
//! - [`lifecycle`]: wiring, startup, and shutdown of the whole system.
//!
//! Every actor processes its mailbox sequentially, so each order transition
//! runs start-to-finish against a consistent view of the store and
//! concurrent calls on one order serialize; the loser sees the new status
//! and fails with [`MarketError::InvalidState`](error::MarketError).

pub mod cart_actor;
pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod notification_actor;
pub mod order_actor;
pub mod payment_actor;
pub mod product_actor;
pub mod projection;
pub mod user_actor;
