//! Membership store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::result::AppResult;
use grouphub_entity::membership::{GroupMemberView, GroupRole, Membership};

/// Access to membership rows.
///
/// Besides group creation, only the membership workflow writes here.
#[async_trait]
pub trait MembershipStore: Send + Sync + 'static {
    /// Find the membership for a (group, user) pair.
    async fn find(&self, group_id: Uuid, user_id: Uuid) -> AppResult<Option<Membership>>;

    /// Create a membership row.
    async fn create(&self, group_id: Uuid, user_id: Uuid, role: GroupRole)
    -> AppResult<Membership>;

    /// Delete the membership for a (group, user) pair. Returns `true` if a
    /// row was deleted.
    async fn delete(&self, group_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// User IDs holding the admin role in a group (the owner may or may not
    /// appear, depending on whether an explicit row exists).
    async fn admin_ids(&self, group_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Members of a group joined with profile facts.
    async fn list_members(&self, group_id: Uuid) -> AppResult<Vec<GroupMemberView>>;
}

/// PostgreSQL-backed membership store.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn find(&self, group_id: Uuid, user_id: Uuid) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    async fn create(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupRole,
    ) -> AppResult<Membership> {
        sqlx::query_as::<_, Membership>(
            "INSERT INTO group_members (group_id, user_id, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("group_members_group_id_user_id_key") =>
            {
                AppError::conflict("User is already a member of this group")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create membership", e),
        })
    }

    async fn delete(&self, group_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete membership", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn admin_ids(&self, group_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM group_members WHERE group_id = $1 AND role = 'admin'",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list group admins", e))
    }

    async fn list_members(&self, group_id: Uuid) -> AppResult<Vec<GroupMemberView>> {
        sqlx::query_as::<_, GroupMemberView>(
            "SELECT m.user_id, u.username, u.full_name, m.role, m.joined_at \
             FROM group_members m \
             JOIN users u ON u.id = m.user_id \
             WHERE m.group_id = $1 \
             ORDER BY m.joined_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }
}
