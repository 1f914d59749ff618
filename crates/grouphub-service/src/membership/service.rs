//! Join request and invitation state machine.
//!
//! The only writer of membership rows besides group creation. Terminal
//! transitions (approve, reject, accept) are conditional updates checking
//! the pending status in the same statement, so concurrent reviewers cannot
//! both win; the loser observes `Conflict`.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use grouphub_core::events::{EventPayload, MembershipEvent};
use grouphub_core::{AppError, AppResult};
use grouphub_database::repositories::invitation::InvitationStore;
use grouphub_database::repositories::join_request::JoinRequestStore;
use grouphub_database::repositories::membership::MembershipStore;
use grouphub_database::repositories::permission::PermissionStore;
use grouphub_database::repositories::user::UserStore;
use grouphub_entity::invitation::{Invitation, InvitationAction, InvitationStatus};
use grouphub_entity::join_request::{JoinRequest, JoinRequestStatus, JoinRequestView, ReviewAction};
use grouphub_entity::membership::GroupRole;
use grouphub_entity::permission::Permission;

use crate::authorization::AuthorizationEngine;
use crate::context::RequestContext;
use crate::notification::NotificationEmitter;

/// Manages join requests, invitations, leaving, and removal.
#[derive(Clone)]
pub struct MembershipService {
    auth: AuthorizationEngine,
    join_requests: Arc<dyn JoinRequestStore>,
    invitations: Arc<dyn InvitationStore>,
    memberships: Arc<dyn MembershipStore>,
    permissions: Arc<dyn PermissionStore>,
    users: Arc<dyn UserStore>,
    emitter: NotificationEmitter,
}

impl MembershipService {
    /// Creates a new membership service.
    pub fn new(
        auth: AuthorizationEngine,
        join_requests: Arc<dyn JoinRequestStore>,
        invitations: Arc<dyn InvitationStore>,
        memberships: Arc<dyn MembershipStore>,
        permissions: Arc<dyn PermissionStore>,
        users: Arc<dyn UserStore>,
        emitter: NotificationEmitter,
    ) -> Self {
        Self {
            auth,
            join_requests,
            invitations,
            memberships,
            permissions,
            users,
            emitter,
        }
    }

    /// A non-member asks to join a group.
    pub async fn request_join(&self, ctx: &RequestContext, group_id: Uuid) -> AppResult<JoinRequest> {
        let group = self.auth.require_group(group_id).await?;
        if self.auth.is_member(ctx.user_id, &group).await? {
            return Err(AppError::conflict("You are already a member of this group"));
        }
        if self
            .join_requests
            .find_pending(group.id, ctx.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "A join request is already pending for this group",
            ));
        }

        // The store's pending-pair constraint backstops the check above
        // against a concurrent duplicate.
        let request = self.join_requests.create(group.id, ctx.user_id).await?;
        info!(request_id = %request.id, group_id = %group.id, user_id = %ctx.user_id, "Join request created");

        let admins = self.auth.admin_recipients(&group, ctx.user_id).await?;
        self.emitter
            .emit(
                ctx.user_id,
                &admins,
                EventPayload::Membership(MembershipEvent::JoinRequested {
                    group_id: group.id,
                    request_id: request.id,
                    user_id: ctx.user_id,
                }),
            )
            .await;

        Ok(request)
    }

    /// Pending join requests for a group, admin only.
    pub async fn list_join_requests(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> AppResult<Vec<JoinRequestView>> {
        let group = self.auth.require_group(group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;
        self.join_requests.list_pending(group.id).await
    }

    /// An admin approves or rejects a pending join request.
    pub async fn review_join_request(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        action: ReviewAction,
    ) -> AppResult<JoinRequest> {
        let request = self
            .join_requests
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found("Join request not found"))?;
        let group = self.auth.require_group(request.group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;

        let status = match action {
            ReviewAction::Approve => JoinRequestStatus::Approved,
            ReviewAction::Reject => JoinRequestStatus::Rejected,
        };
        let reviewed_at = Utc::now();
        let resolved = self
            .join_requests
            .resolve(request.id, status, ctx.user_id, reviewed_at)
            .await?;
        if !resolved {
            return Err(AppError::conflict("Join request has already been reviewed"));
        }

        if action == ReviewAction::Approve {
            self.memberships
                .create(group.id, request.user_id, GroupRole::Member)
                .await?;
            self.permissions
                .upsert(&Permission::member_default(request.user_id, group.id))
                .await?;
        }
        info!(request_id = %request.id, group_id = %group.id, ?action, "Join request reviewed");

        let event = match action {
            ReviewAction::Approve => MembershipEvent::JoinRequestApproved {
                group_id: group.id,
                request_id: request.id,
                reviewed_by: ctx.user_id,
            },
            ReviewAction::Reject => MembershipEvent::JoinRequestRejected {
                group_id: group.id,
                request_id: request.id,
                reviewed_by: ctx.user_id,
            },
        };
        self.emitter
            .emit_to(ctx.user_id, request.user_id, EventPayload::Membership(event))
            .await;

        Ok(JoinRequest {
            status,
            reviewed_by: Some(ctx.user_id),
            reviewed_at: Some(reviewed_at),
            ..request
        })
    }

    /// An admin invites a user by username.
    pub async fn invite(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        invitee_username: &str,
    ) -> AppResult<Invitation> {
        let group = self.auth.require_group(group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;

        let invitee = self
            .users
            .find_by_username(invitee_username)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if self.auth.is_member(invitee.id, &group).await? {
            return Err(AppError::conflict(
                "User is already a member of this group",
            ));
        }
        if self
            .invitations
            .find_pending(group.id, invitee.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "An invitation is already pending for this user",
            ));
        }

        let invitation = self
            .invitations
            .create(group.id, ctx.user_id, invitee.id)
            .await?;
        info!(invitation_id = %invitation.id, group_id = %group.id, invitee_id = %invitee.id, "Invitation created");

        self.emitter
            .emit_to(
                ctx.user_id,
                invitee.id,
                EventPayload::Membership(MembershipEvent::InvitationCreated {
                    group_id: group.id,
                    invitation_id: invitation.id,
                    inviter_id: ctx.user_id,
                }),
            )
            .await;

        Ok(invitation)
    }

    /// The invitee accepts or rejects a pending invitation.
    pub async fn respond_invitation(
        &self,
        ctx: &RequestContext,
        invitation_id: Uuid,
        action: InvitationAction,
    ) -> AppResult<Invitation> {
        let invitation = self
            .invitations
            .find_by_id(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation not found"))?;
        if invitation.invitee_id != ctx.user_id {
            return Err(AppError::authorization(
                "Only the invited user may respond to this invitation",
            ));
        }
        let group = self.auth.require_group(invitation.group_id).await?;

        let status = match action {
            InvitationAction::Accept => InvitationStatus::Accepted,
            InvitationAction::Reject => InvitationStatus::Rejected,
        };
        let responded_at = Utc::now();
        let resolved = self
            .invitations
            .resolve(invitation.id, status, responded_at)
            .await?;
        if !resolved {
            return Err(AppError::conflict("Invitation has already been answered"));
        }

        if action == InvitationAction::Accept {
            self.memberships
                .create(group.id, ctx.user_id, GroupRole::Member)
                .await?;
            self.permissions
                .upsert(&Permission::member_default(ctx.user_id, group.id))
                .await?;

            let admins = self.auth.admin_recipients(&group, ctx.user_id).await?;
            self.emitter
                .emit(
                    ctx.user_id,
                    &admins,
                    EventPayload::Membership(MembershipEvent::InvitationAccepted {
                        group_id: group.id,
                        invitation_id: invitation.id,
                        invitee_id: ctx.user_id,
                    }),
                )
                .await;
        }
        info!(invitation_id = %invitation.id, group_id = %group.id, ?action, "Invitation answered");

        Ok(Invitation {
            status,
            responded_at: Some(responded_at),
            ..invitation
        })
    }

    /// A member leaves a group. The owner cannot leave their own group.
    pub async fn leave(&self, ctx: &RequestContext, group_id: Uuid) -> AppResult<()> {
        let group = self.auth.require_group(group_id).await?;
        if group.is_owner(ctx.user_id) {
            return Err(AppError::conflict("The group owner cannot leave the group"));
        }

        let removed = self.memberships.delete(group.id, ctx.user_id).await?;
        if !removed {
            return Err(AppError::not_found("You are not a member of this group"));
        }
        self.permissions.delete(ctx.user_id, group.id).await?;
        info!(group_id = %group.id, user_id = %ctx.user_id, "Member left group");

        let admins = self.auth.admin_recipients(&group, ctx.user_id).await?;
        self.emitter
            .emit(
                ctx.user_id,
                &admins,
                EventPayload::Membership(MembershipEvent::MemberLeft {
                    group_id: group.id,
                    user_id: ctx.user_id,
                }),
            )
            .await;

        Ok(())
    }

    /// An admin removes a member. The owner cannot be removed.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        target_user_id: Uuid,
    ) -> AppResult<()> {
        let group = self.auth.require_group(group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;
        if group.is_owner(target_user_id) {
            return Err(AppError::conflict("The group owner cannot be removed"));
        }

        let removed = self.memberships.delete(group.id, target_user_id).await?;
        if !removed {
            return Err(AppError::not_found("User is not a member of this group"));
        }
        self.permissions.delete(target_user_id, group.id).await?;
        info!(group_id = %group.id, target = %target_user_id, removed_by = %ctx.user_id, "Member removed");

        self.emitter
            .emit_to(
                ctx.user_id,
                target_user_id,
                EventPayload::Membership(MembershipEvent::MemberRemoved {
                    group_id: group.id,
                    user_id: target_user_id,
                    removed_by: ctx.user_id,
                }),
            )
            .await;

        Ok(())
    }
}
