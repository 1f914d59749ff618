//! Identity verification seam.

use async_trait::async_trait;

use crate::identity::Identity;
use crate::result::AppResult;

/// Resolves a session token to a caller identity.
///
/// Token issuance, hashing, and expiry policy belong to the external
/// identity provider; this trait only answers "who is this token".
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Verify a session token.
    ///
    /// Returns an `Authentication` error for unknown, inactive, or expired
    /// tokens.
    async fn verify_token(&self, token: &str) -> AppResult<Identity>;
}
