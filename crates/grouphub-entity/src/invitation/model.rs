//! Invitation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle states of an invitation.
///
/// `Accepted` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    /// Awaiting the invitee's response.
    Pending,
    /// Accepted; a membership was created.
    Accepted,
    /// Declined by the invitee.
    Rejected,
}

/// An admin-initiated, invitee-reviewed pending membership offer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invitation {
    /// Unique invitation identifier.
    pub id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The admin who sent the invitation.
    pub inviter_id: Uuid,
    /// The invited user.
    pub invitee_id: Uuid,
    /// Current state.
    pub status: InvitationStatus,
    /// When the invitation was created.
    pub created_at: DateTime<Utc>,
    /// When the invitee responded, once responded.
    pub responded_at: Option<DateTime<Utc>>,
}

/// The invitee's decision on a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationAction {
    /// Join the group.
    Accept,
    /// Decline; no side effects beyond the status change.
    Reject,
}
