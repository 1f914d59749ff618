//! Request DTOs with validation.
//!
//! Every command carries the caller's session token; the dispatcher
//! verifies it before any handler runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use grouphub_entity::invitation::InvitationAction;
use grouphub_entity::join_request::ReviewAction;

/// Ask to join a group.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequestJoinGroup {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group to join.
    pub group_id: Uuid,
}

/// List a group's pending join requests.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListJoinRequests {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group.
    pub group_id: Uuid,
}

/// Approve or reject a pending join request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApproveJoinRequest {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The request under review.
    pub request_id: Uuid,
    /// The decision.
    pub action: ReviewAction,
}

/// Invite a user to a group by username.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InviteToGroup {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group.
    pub group_id: Uuid,
    /// The invitee's username.
    #[validate(length(min = 1, message = "Invitee username is required"))]
    pub invitee_username: String,
}

/// Accept or reject a pending invitation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RespondInvitation {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The invitation.
    pub invitation_id: Uuid,
    /// The decision.
    pub action: InvitationAction,
}

/// Leave a group.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LeaveGroup {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group to leave.
    pub group_id: Uuid,
}

/// Remove a member from a group.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoveMember {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group.
    pub group_id: Uuid,
    /// The member to remove.
    pub target_user_id: Uuid,
}

/// Read the caller's own capability flags in a group.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GetPermissions {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group.
    pub group_id: Uuid,
}

/// Replace a member's capability flags.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePermissions {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group.
    pub group_id: Uuid,
    /// The member whose flags change.
    pub target_user_id: Uuid,
    /// May read directory listings and file metadata.
    pub can_read: bool,
    /// May create files and directories.
    pub can_write: bool,
    /// May delete files.
    pub can_delete: bool,
    /// May manage other members' permissions.
    pub can_manage: bool,
}

/// Create a directory under a parent path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDirectoryRequest {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The owning group.
    pub group_id: Uuid,
    /// The new directory's name.
    #[validate(length(min = 1, max = 255, message = "Directory name is required"))]
    pub directory_name: String,
    /// The parent path; `"/"` for the root.
    pub parent_path: String,
}

/// Rename a directory.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameDirectoryRequest {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The directory to rename.
    pub directory_id: Uuid,
    /// The new name.
    #[validate(length(min = 1, max = 255, message = "New name is required"))]
    pub new_name: String,
}

/// Delete a directory subtree.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteDirectoryRequest {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The directory to delete.
    pub directory_id: Uuid,
    /// Whether a non-empty subtree may be deleted.
    pub recursive: bool,
}

/// Copy a directory subtree under a destination path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CopyDirectoryRequest {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The directory to copy.
    pub directory_id: Uuid,
    /// The destination parent path.
    pub destination_path: String,
}

/// Move a directory subtree under a destination path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MoveDirectoryRequest {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The directory to move.
    pub directory_id: Uuid,
    /// The destination parent path.
    pub destination_path: String,
}

/// Create a group.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// Display name.
    #[validate(length(min = 1, max = 128, message = "Group name is required"))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// List the caller's groups.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListMyGroups {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// List a group's members.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListGroupMembers {
    /// Session token.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// The group.
    pub group_id: Uuid,
}
