//! Group creation and member listings.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use grouphub_core::{AppError, AppResult};
use grouphub_database::repositories::group::GroupStore;
use grouphub_database::repositories::membership::MembershipStore;
use grouphub_database::repositories::permission::PermissionStore;
use grouphub_entity::group::{CreateGroup, Group, GroupSummary};
use grouphub_entity::membership::{GroupMemberView, GroupRole};
use grouphub_entity::permission::Permission;

use crate::authorization::AuthorizationEngine;
use crate::context::RequestContext;

/// Manages groups and their member listings.
#[derive(Clone)]
pub struct GroupService {
    auth: AuthorizationEngine,
    groups: Arc<dyn GroupStore>,
    memberships: Arc<dyn MembershipStore>,
    permissions: Arc<dyn PermissionStore>,
}

impl GroupService {
    /// Creates a new group service.
    pub fn new(
        auth: AuthorizationEngine,
        groups: Arc<dyn GroupStore>,
        memberships: Arc<dyn MembershipStore>,
        permissions: Arc<dyn PermissionStore>,
    ) -> Self {
        Self {
            auth,
            groups,
            memberships,
            permissions,
        }
    }

    /// Create a group. The creator becomes the owner, an admin member, and
    /// receives all capability flags.
    pub async fn create_group(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
    ) -> AppResult<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Group name cannot be empty"));
        }

        let group = self
            .groups
            .create(&CreateGroup {
                name: name.to_string(),
                description: description.trim().to_string(),
                owner_id: ctx.user_id,
            })
            .await?;
        self.memberships
            .create(group.id, ctx.user_id, GroupRole::Admin)
            .await?;
        self.permissions
            .upsert(&Permission::owner_default(ctx.user_id, group.id))
            .await?;
        info!(group_id = %group.id, owner_id = %ctx.user_id, "Group created");

        Ok(group)
    }

    /// Groups the acting user owns or belongs to.
    pub async fn list_my_groups(&self, ctx: &RequestContext) -> AppResult<Vec<GroupSummary>> {
        self.groups.list_for_user(ctx.user_id).await
    }

    /// Members of a group. Member only.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> AppResult<Vec<GroupMemberView>> {
        let group = self.auth.require_group(group_id).await?;
        self.auth.require_member(ctx.user_id, &group).await?;
        self.memberships.list_members(group.id).await
    }
}
