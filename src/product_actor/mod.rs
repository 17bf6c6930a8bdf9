//! # Product Actor — the Inventory Ledger
//!
//! Owns the catalog and its stock counters. Stock moves through exactly two
//! primitives, [`ProductAction::Reserve`] and [`ProductAction::Release`],
//! each an atomic check-and-move inside the actor's mailbox turn: two
//! concurrent reservations of the last unit cannot both succeed, and no
//! interleaving can drive stock negative.
//!
//! The default low-stock threshold is injected as the actor's run context
//! ([`InventoryConfig`](crate::config::InventoryConfig)), not baked in as a
//! constant.

pub mod actions;
pub mod entity;

pub use actions::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::clients::ProductClient;
use crate::framework::ResourceActor;
use crate::model::Product;

/// Creates the product actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let seq = Arc::new(AtomicU64::new(1));
    let next_product_id = move || format!("product_{}", seq.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_product_id);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
