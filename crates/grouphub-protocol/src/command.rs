//! The typed command surface.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::request::*;

/// One inbound request line, parsed once at the boundary.
///
/// The wire envelope is `{"type": "<COMMAND>", "data": {...}}`; unknown
/// command names fail deserialization and surface as an invalid request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Command {
    /// Ask to join a group.
    #[serde(rename = "REQUEST_JOIN_GROUP")]
    RequestJoinGroup(RequestJoinGroup),
    /// List a group's pending join requests.
    #[serde(rename = "LIST_JOIN_REQUESTS")]
    ListJoinRequests(ListJoinRequests),
    /// Approve or reject a pending join request.
    #[serde(rename = "APPROVE_JOIN_REQUEST")]
    ApproveJoinRequest(ApproveJoinRequest),
    /// Invite a user by username.
    #[serde(rename = "INVITE_TO_GROUP")]
    InviteToGroup(InviteToGroup),
    /// Accept or reject a pending invitation.
    #[serde(rename = "RESPOND_INVITATION")]
    RespondInvitation(RespondInvitation),
    /// Leave a group.
    #[serde(rename = "LEAVE_GROUP")]
    LeaveGroup(LeaveGroup),
    /// Remove a member from a group.
    #[serde(rename = "REMOVE_MEMBER")]
    RemoveMember(RemoveMember),
    /// Read the caller's own capability flags.
    #[serde(rename = "GET_PERMISSIONS")]
    GetPermissions(GetPermissions),
    /// Replace a member's capability flags.
    #[serde(rename = "UPDATE_PERMISSIONS")]
    UpdatePermissions(UpdatePermissions),
    /// Create a directory.
    #[serde(rename = "CREATE_DIRECTORY")]
    CreateDirectory(CreateDirectoryRequest),
    /// Rename a directory subtree.
    #[serde(rename = "RENAME_DIRECTORY")]
    RenameDirectory(RenameDirectoryRequest),
    /// Delete a directory subtree.
    #[serde(rename = "DELETE_DIRECTORY")]
    DeleteDirectory(DeleteDirectoryRequest),
    /// Copy a directory subtree.
    #[serde(rename = "COPY_DIRECTORY")]
    CopyDirectory(CopyDirectoryRequest),
    /// Move a directory subtree.
    #[serde(rename = "MOVE_DIRECTORY")]
    MoveDirectory(MoveDirectoryRequest),
    /// Create a group.
    #[serde(rename = "CREATE_GROUP")]
    CreateGroup(CreateGroupRequest),
    /// List the caller's groups.
    #[serde(rename = "LIST_MY_GROUPS")]
    ListMyGroups(ListMyGroups),
    /// List a group's members.
    #[serde(rename = "LIST_GROUP_MEMBERS")]
    ListGroupMembers(ListGroupMembers),
}

impl Command {
    /// The caller's session token.
    pub fn token(&self) -> &str {
        match self {
            Command::RequestJoinGroup(r) => &r.token,
            Command::ListJoinRequests(r) => &r.token,
            Command::ApproveJoinRequest(r) => &r.token,
            Command::InviteToGroup(r) => &r.token,
            Command::RespondInvitation(r) => &r.token,
            Command::LeaveGroup(r) => &r.token,
            Command::RemoveMember(r) => &r.token,
            Command::GetPermissions(r) => &r.token,
            Command::UpdatePermissions(r) => &r.token,
            Command::CreateDirectory(r) => &r.token,
            Command::RenameDirectory(r) => &r.token,
            Command::DeleteDirectory(r) => &r.token,
            Command::CopyDirectory(r) => &r.token,
            Command::MoveDirectory(r) => &r.token,
            Command::CreateGroup(r) => &r.token,
            Command::ListMyGroups(r) => &r.token,
            Command::ListGroupMembers(r) => &r.token,
        }
    }

    /// Run field validation for the wrapped request.
    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Command::RequestJoinGroup(r) => r.validate(),
            Command::ListJoinRequests(r) => r.validate(),
            Command::ApproveJoinRequest(r) => r.validate(),
            Command::InviteToGroup(r) => r.validate(),
            Command::RespondInvitation(r) => r.validate(),
            Command::LeaveGroup(r) => r.validate(),
            Command::RemoveMember(r) => r.validate(),
            Command::GetPermissions(r) => r.validate(),
            Command::UpdatePermissions(r) => r.validate(),
            Command::CreateDirectory(r) => r.validate(),
            Command::RenameDirectory(r) => r.validate(),
            Command::DeleteDirectory(r) => r.validate(),
            Command::CopyDirectory(r) => r.validate(),
            Command::MoveDirectory(r) => r.validate(),
            Command::CreateGroup(r) => r.validate(),
            Command::ListMyGroups(r) => r.validate(),
            Command::ListGroupMembers(r) => r.validate(),
        }
    }
}
