//! Domain events emitted by GroupHub operations.
//!
//! Events are handed to the notification sink on every state-changing
//! workflow or hierarchy transition. Delivery and read/unread bookkeeping
//! happen outside this system.

pub mod directory;
pub mod membership;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use directory::DirectoryEvent;
pub use membership::MembershipEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: Uuid,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A membership workflow event.
    Membership(MembershipEvent),
    /// A directory hierarchy event.
    Directory(DirectoryEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Uuid, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }
}
