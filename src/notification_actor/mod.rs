//! # Notification Actor
//!
//! Stores per-recipient messages. The order engine treats sends as
//! fire-and-forget: a failed send is logged by the caller and never rolls
//! back the transition that produced it.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::clients::NotificationClient;
use crate::error::MarketError;
use crate::model::{Notification, NotificationId, NotificationKind, ReferenceKind, UserId};

type Reply<T> = oneshot::Sender<Result<T, MarketError>>;

#[derive(Debug)]
pub enum NotificationRequest {
    Send {
        recipient: UserId,
        kind: NotificationKind,
        title: String,
        body: String,
        reference_kind: ReferenceKind,
        reference_id: String,
        respond_to: Reply<NotificationId>,
    },
    /// Notifications for one recipient, oldest first.
    ListFor {
        recipient: UserId,
        unread_only: bool,
        respond_to: Reply<Vec<Notification>>,
    },
    /// Mark one of the recipient's notifications as read. Someone else's
    /// notification is invisible, hence `NotFound`.
    MarkRead {
        id: NotificationId,
        recipient: UserId,
        respond_to: Reply<()>,
    },
}

pub struct NotificationActor {
    receiver: mpsc::Receiver<NotificationRequest>,
    store: HashMap<NotificationId, Notification>,
    next_id: NotificationId,
}

/// Creates the notification actor and its client.
pub fn new(buffer_size: usize) -> (NotificationActor, NotificationClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = NotificationActor {
        receiver,
        store: HashMap::new(),
        next_id: 1,
    };
    (actor, NotificationClient::new(sender))
}

impl NotificationActor {
    pub async fn run(mut self) {
        info!("Notification actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                NotificationRequest::Send {
                    recipient,
                    kind,
                    title,
                    body,
                    reference_kind,
                    reference_id,
                    respond_to,
                } => {
                    let id = self.next_id;
                    self.next_id += 1;
                    debug!(%recipient, ?kind, id, "Send");
                    self.store.insert(
                        id,
                        Notification {
                            id,
                            recipient,
                            kind,
                            title,
                            body,
                            reference_kind,
                            reference_id,
                            read: false,
                        },
                    );
                    let _ = respond_to.send(Ok(id));
                }
                NotificationRequest::ListFor {
                    recipient,
                    unread_only,
                    respond_to,
                } => {
                    let mut items: Vec<Notification> = self
                        .store
                        .values()
                        .filter(|n| n.recipient == recipient && (!unread_only || !n.read))
                        .cloned()
                        .collect();
                    items.sort_by_key(|n| n.id);
                    debug!(%recipient, unread_only, count = items.len(), "ListFor");
                    let _ = respond_to.send(Ok(items));
                }
                NotificationRequest::MarkRead {
                    id,
                    recipient,
                    respond_to,
                } => {
                    debug!(id, %recipient, "MarkRead");
                    let result = match self.store.get_mut(&id) {
                        Some(n) if n.recipient == recipient => {
                            n.read = true;
                            Ok(())
                        }
                        _ => Err(MarketError::NotFound(format!("notification {id} not found"))),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(size = self.store.len(), "Notification actor shutdown");
    }
}
