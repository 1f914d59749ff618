//! User lookups.
//!
//! User administration belongs to the external identity provider; this
//! store only resolves usernames and profile facts.

use async_trait::async_trait;
use sqlx::PgPool;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::result::AppResult;
use grouphub_entity::user::User;

/// Read-only access to user rows.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by login name.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
}

/// PostgreSQL-backed user store.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
        })
    }
}
