//! Membership workflow events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events produced by the membership workflow state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// A user asked to join a group; sent to every group admin.
    JoinRequested {
        /// The group being joined.
        group_id: Uuid,
        /// The pending join request.
        request_id: Uuid,
        /// The requesting user.
        user_id: Uuid,
    },
    /// An admin approved a join request; sent to the requester.
    JoinRequestApproved {
        /// The group joined.
        group_id: Uuid,
        /// The resolved request.
        request_id: Uuid,
        /// The reviewing admin.
        reviewed_by: Uuid,
    },
    /// An admin rejected a join request; sent to the requester.
    JoinRequestRejected {
        /// The group.
        group_id: Uuid,
        /// The resolved request.
        request_id: Uuid,
        /// The reviewing admin.
        reviewed_by: Uuid,
    },
    /// An admin invited a user; sent to the invitee.
    InvitationCreated {
        /// The group.
        group_id: Uuid,
        /// The pending invitation.
        invitation_id: Uuid,
        /// The inviting admin.
        inviter_id: Uuid,
    },
    /// An invitee accepted an invitation; sent to every group admin.
    InvitationAccepted {
        /// The group joined.
        group_id: Uuid,
        /// The resolved invitation.
        invitation_id: Uuid,
        /// The new member.
        invitee_id: Uuid,
    },
    /// A member left a group; sent to the remaining admins.
    MemberLeft {
        /// The group left.
        group_id: Uuid,
        /// The departed member.
        user_id: Uuid,
    },
    /// An admin removed a member; sent to the removed user.
    MemberRemoved {
        /// The group.
        group_id: Uuid,
        /// The removed member.
        user_id: Uuid,
        /// The removing admin.
        removed_by: Uuid,
    },
}
