//! Membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::GroupRole;

/// A durable record that a user belongs to a group.
///
/// Pending states live in `JoinRequest`/`Invitation`; a membership row only
/// ever exists in the approved state. Its existence, plus group ownership,
/// is the sole source of "is member" / "is admin" truth.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// The member.
    pub user_id: Uuid,
    /// The member's role in the group.
    pub role: GroupRole,
    /// When the membership was created.
    pub joined_at: DateTime<Utc>,
}

/// A group member joined with user profile facts, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMemberView {
    /// The member's user ID.
    pub user_id: Uuid,
    /// Login name.
    pub username: String,
    /// Full name, if set.
    pub full_name: Option<String>,
    /// Role in the group.
    pub role: GroupRole,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
}
