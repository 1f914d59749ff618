//! Command dispatch.
//!
//! One request line in, one response line out, always. Parsing and field
//! validation happen before token verification; verification happens before
//! any handler runs, so an unauthenticated caller learns nothing about the
//! targeted resources.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error};

use grouphub_core::AppResult;
use grouphub_core::traits::IdentityVerifier;
use grouphub_service::{
    DirectoryService, GroupService, MembershipService, PermissionService, RequestContext,
};

use crate::command::Command;
use crate::response::Response;

/// Routes parsed commands to the service layer.
#[derive(Clone)]
pub struct Dispatcher {
    verifier: Arc<dyn IdentityVerifier>,
    memberships: MembershipService,
    directories: DirectoryService,
    groups: GroupService,
    permissions: PermissionService,
}

impl Dispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        memberships: MembershipService,
        directories: DirectoryService,
        groups: GroupService,
        permissions: PermissionService,
    ) -> Self {
        Self {
            verifier,
            memberships,
            directories,
            groups,
            permissions,
        }
    }

    /// Handle one raw request line.
    pub async fn dispatch_line(&self, line: &str) -> Response {
        let command: Command = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "Rejected unparseable request");
                return Response::invalid(format!("Malformed request: {e}"));
            }
        };
        if let Err(e) = command.validate() {
            return Response::invalid(format!("Invalid request: {e}"));
        }

        let ctx = match self.verifier.verify_token(command.token()).await {
            Ok(identity) => RequestContext::from(identity),
            Err(e) => return Response::from(e),
        };

        match self.handle(&ctx, command).await {
            Ok(response) => response,
            Err(e) => {
                if matches!(
                    e.kind,
                    grouphub_core::error::ErrorKind::Internal
                        | grouphub_core::error::ErrorKind::Database
                        | grouphub_core::error::ErrorKind::Serialization
                ) {
                    error!(error = %e, "Command failed");
                }
                Response::from(e)
            }
        }
    }

    async fn handle(&self, ctx: &RequestContext, command: Command) -> AppResult<Response> {
        match command {
            Command::RequestJoinGroup(r) => {
                let request = self.memberships.request_join(ctx, r.group_id).await?;
                Ok(Response::created(
                    "SUCCESS_JOIN_REQUESTED",
                    "Join request created",
                    json!({ "request_id": request.id, "status": request.status }),
                ))
            }
            Command::ListJoinRequests(r) => {
                let requests = self.memberships.list_join_requests(ctx, r.group_id).await?;
                Ok(Response::ok(
                    "SUCCESS_JOIN_REQUESTS_LISTED",
                    "Pending join requests",
                    json!({ "requests": to_value(&requests)? }),
                ))
            }
            Command::ApproveJoinRequest(r) => {
                let request = self
                    .memberships
                    .review_join_request(ctx, r.request_id, r.action)
                    .await?;
                Ok(Response::ok(
                    "SUCCESS_JOIN_REQUEST_REVIEWED",
                    "Join request reviewed",
                    json!({
                        "request_id": request.id,
                        "user_id": request.user_id,
                        "group_id": request.group_id,
                        "status": request.status,
                    }),
                ))
            }
            Command::InviteToGroup(r) => {
                let invitation = self
                    .memberships
                    .invite(ctx, r.group_id, &r.invitee_username)
                    .await?;
                Ok(Response::created(
                    "SUCCESS_INVITATION_CREATED",
                    "Invitation sent",
                    json!({
                        "invitation_id": invitation.id,
                        "group_id": invitation.group_id,
                        "invitee_id": invitation.invitee_id,
                        "status": invitation.status,
                    }),
                ))
            }
            Command::RespondInvitation(r) => {
                let invitation = self
                    .memberships
                    .respond_invitation(ctx, r.invitation_id, r.action)
                    .await?;
                Ok(Response::ok(
                    "SUCCESS_INVITATION_ANSWERED",
                    "Invitation answered",
                    json!({
                        "invitation_id": invitation.id,
                        "group_id": invitation.group_id,
                        "status": invitation.status,
                    }),
                ))
            }
            Command::LeaveGroup(r) => {
                self.memberships.leave(ctx, r.group_id).await?;
                Ok(Response::ok("SUCCESS_GROUP_LEFT", "Left the group", json!({})))
            }
            Command::RemoveMember(r) => {
                self.memberships
                    .remove_member(ctx, r.group_id, r.target_user_id)
                    .await?;
                Ok(Response::ok(
                    "SUCCESS_MEMBER_REMOVED",
                    "Member removed",
                    json!({}),
                ))
            }
            Command::GetPermissions(r) => {
                let permission = self.permissions.get_permissions(ctx, r.group_id).await?;
                Ok(Response::ok(
                    "SUCCESS_PERMISSIONS_FETCHED",
                    "Permissions",
                    to_value(&permission)?,
                ))
            }
            Command::UpdatePermissions(r) => {
                let granted = self
                    .permissions
                    .update_permissions(
                        ctx,
                        r.group_id,
                        r.target_user_id,
                        grouphub_service::permission::PermissionFlags {
                            can_read: r.can_read,
                            can_write: r.can_write,
                            can_delete: r.can_delete,
                            can_manage: r.can_manage,
                        },
                    )
                    .await?;
                Ok(Response::ok(
                    "SUCCESS_PERMISSIONS_UPDATED",
                    "Permissions updated",
                    to_value(&granted)?,
                ))
            }
            Command::CreateDirectory(r) => {
                let directory = self
                    .directories
                    .create_directory(ctx, r.group_id, &r.directory_name, &r.parent_path)
                    .await?;
                Ok(Response::created(
                    "SUCCESS_DIRECTORY_CREATED",
                    "Directory created",
                    json!({
                        "directory_id": directory.id,
                        "path": directory.path,
                    }),
                ))
            }
            Command::RenameDirectory(r) => {
                let outcome = self
                    .directories
                    .rename_directory(ctx, r.directory_id, &r.new_name)
                    .await?;
                Ok(Response::ok(
                    "SUCCESS_DIRECTORY_RENAMED",
                    "Directory renamed",
                    cascade_payload(&outcome)?,
                ))
            }
            Command::MoveDirectory(r) => {
                let outcome = self
                    .directories
                    .move_directory(ctx, r.directory_id, &r.destination_path)
                    .await?;
                Ok(Response::ok(
                    "SUCCESS_DIRECTORY_MOVED",
                    "Directory moved",
                    cascade_payload(&outcome)?,
                ))
            }
            Command::CopyDirectory(r) => {
                let outcome = self
                    .directories
                    .copy_directory(ctx, r.directory_id, &r.destination_path)
                    .await?;
                Ok(Response::created(
                    "SUCCESS_DIRECTORY_COPIED",
                    "Directory copied",
                    cascade_payload(&outcome)?,
                ))
            }
            Command::DeleteDirectory(r) => {
                let outcome = self
                    .directories
                    .delete_directory(ctx, r.directory_id, r.recursive)
                    .await?;
                Ok(Response::ok(
                    "SUCCESS_DIRECTORY_DELETED",
                    "Directory deleted",
                    json!({
                        "directory_id": outcome.directory_id,
                        "path": outcome.path,
                        "deleted_files": outcome.deleted.files,
                        "deleted_subdirectories": outcome.deleted.subdirectories,
                    }),
                ))
            }
            Command::CreateGroup(r) => {
                let group = self.groups.create_group(ctx, &r.name, &r.description).await?;
                Ok(Response::created(
                    "SUCCESS_GROUP_CREATED",
                    "Group created",
                    json!({
                        "group_id": group.id,
                        "name": group.name,
                        "owner_id": group.owner_id,
                    }),
                ))
            }
            Command::ListMyGroups(_) => {
                let groups = self.groups.list_my_groups(ctx).await?;
                Ok(Response::ok(
                    "SUCCESS_GROUPS_LISTED",
                    "Your groups",
                    json!({ "groups": to_value(&groups)? }),
                ))
            }
            Command::ListGroupMembers(r) => {
                let members = self.groups.list_members(ctx, r.group_id).await?;
                Ok(Response::ok(
                    "SUCCESS_MEMBERS_LISTED",
                    "Group members",
                    json!({ "members": to_value(&members)? }),
                ))
            }
        }
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(value)?)
}

fn cascade_payload(outcome: &grouphub_service::directory::CascadeOutcome) -> AppResult<Value> {
    Ok(json!({
        "directory_id": outcome.directory.id,
        "path": outcome.directory.path,
        "affected_files": outcome.affected.files,
        "affected_subdirectories": outcome.affected.subdirectories,
    }))
}
