//! Reading and granting capability flags.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use grouphub_core::{AppError, AppResult};
use grouphub_database::repositories::permission::PermissionStore;
use grouphub_entity::permission::Permission;

use crate::authorization::AuthorizationEngine;
use crate::context::RequestContext;

/// The four independent capability flags of a grant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PermissionFlags {
    /// May read directory listings and file metadata.
    pub can_read: bool,
    /// May create files and directories.
    pub can_write: bool,
    /// May delete files.
    pub can_delete: bool,
    /// May manage other members' permissions.
    pub can_manage: bool,
}

/// Manages per-user, per-group capability flags.
#[derive(Clone)]
pub struct PermissionService {
    auth: AuthorizationEngine,
    permissions: Arc<dyn PermissionStore>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(auth: AuthorizationEngine, permissions: Arc<dyn PermissionStore>) -> Self {
        Self { auth, permissions }
    }

    /// The acting user's own flags in a group. Member only.
    pub async fn get_permissions(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> AppResult<Permission> {
        let group = self.auth.require_group(group_id).await?;
        self.auth.require_member(ctx.user_id, &group).await?;
        self.auth.permissions(ctx.user_id, &group).await
    }

    /// Replace a member's flags. Admin only; the owner's flags derive from
    /// ownership and cannot be edited.
    pub async fn update_permissions(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        target_user_id: Uuid,
        flags: PermissionFlags,
    ) -> AppResult<Permission> {
        let group = self.auth.require_group(group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;
        if group.is_owner(target_user_id) {
            return Err(AppError::conflict(
                "The owner's permissions cannot be modified",
            ));
        }
        if !self.auth.is_member(target_user_id, &group).await? {
            return Err(AppError::not_found("User is not a member of this group"));
        }

        let granted = self
            .permissions
            .upsert(&Permission {
                user_id: target_user_id,
                group_id: group.id,
                can_read: flags.can_read,
                can_write: flags.can_write,
                can_delete: flags.can_delete,
                can_manage: flags.can_manage,
                granted_at: Utc::now(),
            })
            .await?;
        info!(group_id = %group.id, target = %target_user_id, granted_by = %ctx.user_id, "Permissions updated");

        Ok(granted)
    }
}
