//! Session-token identity verification.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::identity::Identity;
use grouphub_core::result::AppResult;
use grouphub_core::traits::IdentityVerifier;

/// Resolves session tokens against the sessions table.
///
/// Sessions are issued by the external identity provider; this repository
/// only reads them, so an unknown, inactive, or expired token simply fails
/// verification.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityVerifier for SessionRepository {
    async fn verify_token(&self, token: &str) -> AppResult<Identity> {
        let row: Option<(Uuid, String)> = sqlx::query_as(
            "SELECT s.user_id, u.username FROM sessions s \
             JOIN users u ON s.user_id = u.id \
             WHERE s.session_token = $1 AND s.is_active = TRUE AND s.expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to verify session", e))?;

        row.map(|(user_id, username)| Identity { user_id, username })
            .ok_or_else(|| AppError::authentication("Invalid session token or session expired"))
    }
}
