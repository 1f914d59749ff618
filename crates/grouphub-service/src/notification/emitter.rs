//! Fire-and-forget event emission.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use grouphub_core::events::{DomainEvent, EventPayload};
use grouphub_core::traits::NotificationSink;

/// Hands domain events to the notification sink.
///
/// Emission never fails the operation that produced the event: sink errors
/// are logged and swallowed. Each recipient receives the event exactly once
/// per call; duplicates in the recipient list are dropped.
#[derive(Clone)]
pub struct NotificationEmitter {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationEmitter {
    /// Creates a new notification emitter.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Emit one event to each recipient.
    pub async fn emit(&self, actor_id: Uuid, recipients: &[Uuid], payload: EventPayload) {
        let event = DomainEvent::new(actor_id, payload);
        let mut seen: Vec<Uuid> = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            if seen.contains(recipient) {
                continue;
            }
            seen.push(*recipient);
            if let Err(e) = self.sink.emit(*recipient, &event).await {
                warn!(
                    event_id = %event.id,
                    recipient = %recipient,
                    error = %e,
                    "Failed to emit notification"
                );
            }
        }
    }

    /// Emit one event to a single recipient.
    pub async fn emit_to(&self, actor_id: Uuid, recipient: Uuid, payload: EventPayload) {
        self.emit(actor_id, &[recipient], payload).await;
    }
}
