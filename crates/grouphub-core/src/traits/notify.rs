//! Notification emission seam.

use async_trait::async_trait;
use uuid::Uuid;

use crate::events::DomainEvent;
use crate::result::AppResult;

/// Accepts domain events for delivery to a recipient.
///
/// Implementations hand events off to the external notification service;
/// persistence and read/unread state live there. Callers treat emission as
/// fire-and-forget: a sink failure must never roll back the transition that
/// produced the event.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    /// Emit one event to one recipient.
    async fn emit(&self, recipient_id: Uuid, event: &DomainEvent) -> AppResult<()>;
}
