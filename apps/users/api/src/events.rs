//! User events over NATS.

use async_nats::Client;
use async_trait::async_trait;
use domain_users::{UserEvent, UserNotifier};
use tracing::{error, info, instrument};

pub const USER_EVENTS_SUBJECT: &str = "user-events";

/// Publishes every [`UserEvent`] as JSON on a NATS subject
#[derive(Clone)]
pub struct NatsNotifier {
    client: Client,
    subject: String,
}

impl NatsNotifier {
    pub fn new(client: Client) -> Self {
        Self::with_subject(client, USER_EVENTS_SUBJECT)
    }

    pub fn with_subject(client: Client, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl UserNotifier for NatsNotifier {
    #[instrument(skip(self, event), fields(subject = %self.subject, operation = %event.operation))]
    async fn notify(&self, event: UserEvent) {
        match serde_json::to_vec(&event) {
            Ok(payload) => {
                if let Err(e) = self
                    .client
                    .publish(self.subject.clone(), payload.into())
                    .await
                {
                    error!(error = %e, "Failed to publish user event");
                } else {
                    info!(email = %event.email, "User event published");
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize user event");
            }
        }
    }
}
