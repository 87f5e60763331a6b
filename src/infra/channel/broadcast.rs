use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::models::notification::Notification;
use crate::domain::ports::NotificationChannel;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct NotificationPush {
    pub user_id: String,
    pub notification: Notification,
}

/// Default publish capability: an in-process broadcast bus a socket layer
/// can subscribe to. The core holds no connection state; a send with no
/// subscribers is not a failure.
pub struct BroadcastNotificationChannel {
    tx: broadcast::Sender<NotificationPush>,
}

impl BroadcastNotificationChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationPush> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl NotificationChannel for BroadcastNotificationChannel {
    async fn publish(&self, user_id: &str, notification: &Notification) -> Result<(), AppError> {
        let _ = self.tx.send(NotificationPush {
            user_id: user_id.to_string(),
            notification: notification.clone(),
        });
        Ok(())
    }
}
