//! Group store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::result::AppResult;
use grouphub_entity::group::{CreateGroup, Group, GroupSummary};

/// Access to group rows.
#[async_trait]
pub trait GroupStore: Send + Sync + 'static {
    /// Find a group by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Group>>;

    /// Create a new group.
    async fn create(&self, data: &CreateGroup) -> AppResult<Group>;

    /// List the groups a user belongs to (owned groups included), with the
    /// user's role and the member count.
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<GroupSummary>>;
}

/// PostgreSQL-backed group store.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Create a new group repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Group>> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find group", e))
    }

    async fn create(&self, data: &CreateGroup) -> AppResult<Group> {
        sqlx::query_as::<_, Group>(
            "INSERT INTO groups (name, description, owner_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create group", e))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<GroupSummary>> {
        sqlx::query_as::<_, GroupSummary>(
            "SELECT g.id AS group_id, g.name, g.description, \
                    CASE WHEN g.owner_id = $1 THEN 'admin' ELSE m.role::text END AS role, \
                    (SELECT COUNT(*) FROM group_members gm WHERE gm.group_id = g.id) AS member_count, \
                    g.created_at \
             FROM groups g \
             LEFT JOIN group_members m ON m.group_id = g.id AND m.user_id = $1 \
             WHERE g.owner_id = $1 OR m.user_id IS NOT NULL \
             ORDER BY g.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list groups", e))
    }
}
