//! Per-user, per-group capability flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Capability flags a user holds inside a group, distinct from role.
///
/// One row per member. Owners receive all four flags at group creation;
/// users joining through an approved request or accepted invitation start
/// with read only. Changed only by explicit admin grants afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// The user.
    pub user_id: Uuid,
    /// The group.
    pub group_id: Uuid,
    /// May read directory listings and file metadata.
    pub can_read: bool,
    /// May create files and directories.
    pub can_write: bool,
    /// May delete files.
    pub can_delete: bool,
    /// May manage other members' permissions.
    pub can_manage: bool,
    /// When the row was last granted.
    pub granted_at: DateTime<Utc>,
}

impl Permission {
    /// Default flags for a newly joined member: read only.
    pub fn member_default(user_id: Uuid, group_id: Uuid) -> Self {
        Self {
            user_id,
            group_id,
            can_read: true,
            can_write: false,
            can_delete: false,
            can_manage: false,
            granted_at: Utc::now(),
        }
    }

    /// Flags for a group owner: everything.
    pub fn owner_default(user_id: Uuid, group_id: Uuid) -> Self {
        Self {
            user_id,
            group_id,
            can_read: true,
            can_write: true,
            can_delete: true,
            can_manage: true,
            granted_at: Utc::now(),
        }
    }
}
