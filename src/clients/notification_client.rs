//! Client for the notification actor.

use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

use crate::error::MarketError;
use crate::model::{Notification, NotificationId, NotificationKind, ReferenceKind, UserId};
use crate::notification_actor::NotificationRequest;

#[derive(Clone)]
pub struct NotificationClient {
    sender: mpsc::Sender<NotificationRequest>,
}

impl NotificationClient {
    pub fn new(sender: mpsc::Sender<NotificationRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<T, MarketError>>) -> NotificationRequest,
    ) -> Result<T, MarketError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| MarketError::Unavailable("notification actor closed".to_string()))?;
        response.await.map_err(|_| {
            MarketError::Unavailable("notification actor dropped response".to_string())
        })?
    }

    #[instrument(skip(self, title, body))]
    pub async fn notify(
        &self,
        recipient: UserId,
        kind: NotificationKind,
        title: String,
        body: String,
        reference_kind: ReferenceKind,
        reference_id: String,
    ) -> Result<NotificationId, MarketError> {
        self.request(|respond_to| NotificationRequest::Send {
            recipient,
            kind,
            title,
            body,
            reference_kind,
            reference_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_for(
        &self,
        recipient: UserId,
        unread_only: bool,
    ) -> Result<Vec<Notification>, MarketError> {
        self.request(|respond_to| NotificationRequest::ListFor {
            recipient,
            unread_only,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> Result<(), MarketError> {
        self.request(|respond_to| NotificationRequest::MarkRead {
            id,
            recipient,
            respond_to,
        })
        .await
    }
}
