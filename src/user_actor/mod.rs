//! # User Actor
//!
//! Manages registered accounts. The simplest actor in the system: plain CRUD,
//! no dependencies, no custom actions. Other actors read it to validate the
//! role and active flag of whoever is driving an order transition.

pub mod entity;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::clients::UserClient;
use crate::framework::ResourceActor;
use crate::model::User;

/// Creates the user actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserClient) {
    let seq = Arc::new(AtomicU64::new(1));
    let next_user_id = move || format!("user_{}", seq.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_user_id);
    let client = UserClient::new(generic_client);

    (actor, client)
}
