use async_trait::async_trait;

use crate::models::UserEvent;

/// Receives a [`UserEvent`] after every successful create and delete.
///
/// Delivery is fire-and-forget: implementations log their own failures and
/// never fail the operation that triggered them.
#[async_trait]
pub trait UserNotifier: Send + Sync {
    async fn notify(&self, event: UserEvent);
}

/// Emits each event as a structured log line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl UserNotifier for LogNotifier {
    async fn notify(&self, event: UserEvent) {
        tracing::info!(
            operation = %event.operation,
            email = %event.email,
            username = %event.username,
            "User event"
        );
    }
}
