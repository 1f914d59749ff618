//! Join request store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::result::AppResult;
use grouphub_entity::join_request::{JoinRequest, JoinRequestStatus, JoinRequestView};

/// Access to join request rows.
#[async_trait]
pub trait JoinRequestStore: Send + Sync + 'static {
    /// Find a join request by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JoinRequest>>;

    /// Find the pending request for a (group, user) pair, if any.
    async fn find_pending(&self, group_id: Uuid, user_id: Uuid) -> AppResult<Option<JoinRequest>>;

    /// Create a pending join request.
    async fn create(&self, group_id: Uuid, user_id: Uuid) -> AppResult<JoinRequest>;

    /// Pending requests for a group, enriched with requester profile facts.
    async fn list_pending(&self, group_id: Uuid) -> AppResult<Vec<JoinRequestView>>;

    /// Resolve a pending request to a terminal status.
    ///
    /// The status check happens in the same statement as the transition, so
    /// a request can be resolved exactly once; returns `false` when the
    /// request was already resolved (or does not exist).
    async fn resolve(
        &self,
        request_id: Uuid,
        status: JoinRequestStatus,
        reviewed_by: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<bool>;
}

/// PostgreSQL-backed join request store.
#[derive(Debug, Clone)]
pub struct JoinRequestRepository {
    pool: PgPool,
}

impl JoinRequestRepository {
    /// Create a new join request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JoinRequestStore for JoinRequestRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JoinRequest>> {
        sqlx::query_as::<_, JoinRequest>("SELECT * FROM join_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find join request", e)
            })
    }

    async fn find_pending(&self, group_id: Uuid, user_id: Uuid) -> AppResult<Option<JoinRequest>> {
        sqlx::query_as::<_, JoinRequest>(
            "SELECT * FROM join_requests \
             WHERE group_id = $1 AND user_id = $2 AND status = 'pending'",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find pending request", e)
        })
    }

    async fn create(&self, group_id: Uuid, user_id: Uuid) -> AppResult<JoinRequest> {
        sqlx::query_as::<_, JoinRequest>(
            "INSERT INTO join_requests (group_id, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("join_requests_pending_pair_idx") =>
            {
                AppError::conflict("A join request is already pending for this group")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create join request", e),
        })
    }

    async fn list_pending(&self, group_id: Uuid) -> AppResult<Vec<JoinRequestView>> {
        sqlx::query_as::<_, JoinRequestView>(
            "SELECT r.id AS request_id, r.user_id, u.username, u.full_name, r.status, r.created_at \
             FROM join_requests r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.group_id = $1 AND r.status = 'pending' \
             ORDER BY r.created_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list join requests", e)
        })
    }

    async fn resolve(
        &self,
        request_id: Uuid,
        status: JoinRequestStatus,
        reviewed_by: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE join_requests SET status = $2, reviewed_by = $3, reviewed_at = $4 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(request_id)
        .bind(status)
        .bind(reviewed_by)
        .bind(reviewed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to resolve join request", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
