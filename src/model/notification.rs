use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Identifier for notifications.
pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    OrderPlaced,
    OrderReceived,
    OrderCancelled,
    OrderShipped,
    OrderDelivered,
    ReturnRequested,
    ReturnCompleted,
    ExchangeRequested,
    ExchangeCompleted,
    LowStockAlert,
}

/// What a notification points back at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    Order,
    Product,
}

/// A stored message for one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub reference_kind: ReferenceKind,
    pub reference_id: String,
    pub read: bool,
}
