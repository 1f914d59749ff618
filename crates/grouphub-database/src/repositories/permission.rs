//! Permission store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::result::AppResult;
use grouphub_entity::permission::Permission;

/// Access to permission rows.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Find the permission row for a (user, group) pair.
    async fn find(&self, user_id: Uuid, group_id: Uuid) -> AppResult<Option<Permission>>;

    /// Insert or replace the permission row for its (user, group) pair.
    async fn upsert(&self, permission: &Permission) -> AppResult<Permission>;

    /// Delete the permission row for a (user, group) pair.
    async fn delete(&self, user_id: Uuid, group_id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed permission store.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn find(&self, user_id: Uuid, group_id: Uuid) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE user_id = $1 AND group_id = $2",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find permissions", e))
    }

    async fn upsert(&self, permission: &Permission) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions \
                 (user_id, group_id, can_read, can_write, can_delete, can_manage, granted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id, group_id) DO UPDATE SET \
                 can_read = EXCLUDED.can_read, \
                 can_write = EXCLUDED.can_write, \
                 can_delete = EXCLUDED.can_delete, \
                 can_manage = EXCLUDED.can_manage, \
                 granted_at = EXCLUDED.granted_at \
             RETURNING *",
        )
        .bind(permission.user_id)
        .bind(permission.group_id)
        .bind(permission.can_read)
        .bind(permission.can_write)
        .bind(permission.can_delete)
        .bind(permission.can_manage)
        .bind(permission.granted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert permissions", e))
    }

    async fn delete(&self, user_id: Uuid, group_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permissions WHERE user_id = $1 AND group_id = $2")
            .bind(user_id)
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete permissions", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
