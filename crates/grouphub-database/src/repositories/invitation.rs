//! Invitation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::result::AppResult;
use grouphub_entity::invitation::{Invitation, InvitationStatus};

/// Access to invitation rows.
#[async_trait]
pub trait InvitationStore: Send + Sync + 'static {
    /// Find an invitation by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invitation>>;

    /// Find the pending invitation for a (group, invitee) pair, if any.
    async fn find_pending(&self, group_id: Uuid, invitee_id: Uuid)
    -> AppResult<Option<Invitation>>;

    /// Create a pending invitation.
    async fn create(
        &self,
        group_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
    ) -> AppResult<Invitation>;

    /// Resolve a pending invitation to a terminal status.
    ///
    /// Conditional on the row still being pending; returns `false` when it
    /// was already responded to (or does not exist).
    async fn resolve(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> AppResult<bool>;
}

/// PostgreSQL-backed invitation store.
#[derive(Debug, Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Create a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>("SELECT * FROM invitations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find invitation", e)
            })
    }

    async fn find_pending(
        &self,
        group_id: Uuid,
        invitee_id: Uuid,
    ) -> AppResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(
            "SELECT * FROM invitations \
             WHERE group_id = $1 AND invitee_id = $2 AND status = 'pending'",
        )
        .bind(group_id)
        .bind(invitee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find pending invitation", e)
        })
    }

    async fn create(
        &self,
        group_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
    ) -> AppResult<Invitation> {
        sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (group_id, inviter_id, invitee_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(group_id)
        .bind(inviter_id)
        .bind(invitee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("invitations_pending_pair_idx") =>
            {
                AppError::conflict("An invitation is already pending for this user")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create invitation", e),
        })
    }

    async fn resolve(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE invitations SET status = $2, responded_at = $3 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(invitation_id)
        .bind(status)
        .bind(responded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve invitation", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
