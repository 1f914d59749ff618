//! Membership and capability checks.
//!
//! Every mutating operation passes through this engine before touching
//! state. Ownership is authoritative: the owner counts as an admin member
//! even when no membership row exists for them, so callers must never rely
//! on membership table scans alone.

use std::sync::Arc;

use uuid::Uuid;

use grouphub_core::{AppError, AppResult};
use grouphub_database::repositories::group::GroupStore;
use grouphub_database::repositories::membership::MembershipStore;
use grouphub_database::repositories::permission::PermissionStore;
use grouphub_entity::group::Group;
use grouphub_entity::membership::GroupRole;
use grouphub_entity::permission::Permission;

/// Answers "may this user do X in this group".
#[derive(Clone)]
pub struct AuthorizationEngine {
    groups: Arc<dyn GroupStore>,
    memberships: Arc<dyn MembershipStore>,
    permissions: Arc<dyn PermissionStore>,
}

impl AuthorizationEngine {
    /// Creates a new authorization engine.
    pub fn new(
        groups: Arc<dyn GroupStore>,
        memberships: Arc<dyn MembershipStore>,
        permissions: Arc<dyn PermissionStore>,
    ) -> Self {
        Self {
            groups,
            memberships,
            permissions,
        }
    }

    /// Load a group or fail with `NotFound`.
    pub async fn require_group(&self, group_id: Uuid) -> AppResult<Group> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))
    }

    /// Whether the user is the owner or holds any membership in the group.
    pub async fn is_member(&self, user_id: Uuid, group: &Group) -> AppResult<bool> {
        if group.is_owner(user_id) {
            return Ok(true);
        }
        Ok(self.memberships.find(group.id, user_id).await?.is_some())
    }

    /// Whether the user is the owner or an admin member of the group.
    pub async fn is_admin(&self, user_id: Uuid, group: &Group) -> AppResult<bool> {
        if group.is_owner(user_id) {
            return Ok(true);
        }
        Ok(self
            .memberships
            .find(group.id, user_id)
            .await?
            .is_some_and(|m| m.role == GroupRole::Admin))
    }

    /// Fail with `Forbidden` unless the user is a member of the group.
    pub async fn require_member(&self, user_id: Uuid, group: &Group) -> AppResult<()> {
        if self.is_member(user_id, group).await? {
            Ok(())
        } else {
            Err(AppError::authorization("You are not a member of this group"))
        }
    }

    /// Fail with `Forbidden` unless the user is an admin of the group.
    pub async fn require_admin(&self, user_id: Uuid, group: &Group) -> AppResult<()> {
        if self.is_admin(user_id, group).await? {
            Ok(())
        } else {
            Err(AppError::authorization(
                "You are not an admin of this group",
            ))
        }
    }

    /// Effective capability flags for a user in a group.
    ///
    /// The owner's flags are derived from ownership when no explicit row
    /// exists; everyone else must have a row.
    pub async fn permissions(&self, user_id: Uuid, group: &Group) -> AppResult<Permission> {
        if let Some(row) = self.permissions.find(user_id, group.id).await? {
            return Ok(row);
        }
        if group.is_owner(user_id) {
            return Ok(Permission::owner_default(user_id, group.id));
        }
        Err(AppError::not_found(
            "No permissions found for this user in this group",
        ))
    }

    /// Recipients for admin-targeted notifications: every admin member plus
    /// the owner, deduplicated, with the acting user excluded.
    pub async fn admin_recipients(&self, group: &Group, actor_id: Uuid) -> AppResult<Vec<Uuid>> {
        let mut recipients = self.memberships.admin_ids(group.id).await?;
        if !recipients.contains(&group.owner_id) {
            recipients.push(group.owner_id);
        }
        recipients.retain(|id| *id != actor_id);
        Ok(recipients)
    }
}
