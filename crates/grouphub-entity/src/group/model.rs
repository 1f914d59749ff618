//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A sharing group.
///
/// The owner is fixed at creation and is implicitly an admin member even
/// when no membership row exists for them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    /// Unique group identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The owning user. Immutable.
    pub owner_id: Uuid,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Check whether a user is the group owner.
    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create a new group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The owning user.
    pub owner_id: Uuid,
}

/// A group as seen in a user's own listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupSummary {
    /// The group ID.
    pub group_id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The listing user's role, `"admin"` for the owner.
    pub role: String,
    /// Member count, the owner included.
    pub member_count: i64,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
}
