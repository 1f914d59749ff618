//! Notification outbox sink.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::events::DomainEvent;
use grouphub_core::result::AppResult;
use grouphub_core::traits::NotificationSink;

/// Writes domain events into the `notification_outbox` table.
///
/// The external notification service drains the outbox on its own schedule;
/// this side only appends. Callers treat emission as fire-and-forget, so a
/// failed insert surfaces here as an error and is logged, never propagated
/// into the originating operation.
#[derive(Debug, Clone)]
pub struct OutboxNotificationSink {
    pool: PgPool,
}

impl OutboxNotificationSink {
    /// Create a new outbox sink.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for OutboxNotificationSink {
    async fn emit(&self, recipient_id: Uuid, event: &DomainEvent) -> AppResult<()> {
        let payload = serde_json::to_value(event)
            .map_err(|e| AppError::with_source(ErrorKind::Serialization, "Failed to serialize event", e))?;

        sqlx::query(
            "INSERT INTO notification_outbox (event_id, recipient_id, occurred_at, payload) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(event.id)
        .bind(recipient_id)
        .bind(event.timestamp)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to enqueue notification", e)
        })?;
        Ok(())
    }
}
