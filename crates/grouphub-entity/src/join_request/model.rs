//! Join request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle states of a join request.
///
/// `Approved` and `Rejected` are terminal; a resolved request is never
/// re-opened. A new request may be created only while none is pending for
/// the same (group, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "join_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JoinRequestStatus {
    /// Awaiting admin review.
    Pending,
    /// Approved by an admin; a membership was created.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

/// A user-initiated, admin-reviewed pending membership offer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JoinRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// The group being joined.
    pub group_id: Uuid,
    /// The requesting user.
    pub user_id: Uuid,
    /// Current state.
    pub status: JoinRequestStatus,
    /// The admin who resolved the request, once resolved.
    pub reviewed_by: Option<Uuid>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was resolved, once resolved.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// A join request joined with requester profile facts, for admin listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JoinRequestView {
    /// The request ID.
    pub request_id: Uuid,
    /// The requesting user.
    pub user_id: Uuid,
    /// Requester login name.
    pub username: String,
    /// Requester full name, if set.
    pub full_name: Option<String>,
    /// Current state.
    pub status: JoinRequestStatus,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}

/// An admin's decision on a pending join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    /// Create a membership for the requester.
    Approve,
    /// Resolve the request without creating a membership.
    Reject,
}
