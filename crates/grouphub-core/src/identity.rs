//! The identity resolved from a session token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A verified caller identity.
///
/// Produced by the identity provider from a session token; how tokens are
/// issued is outside this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The authenticated user's login name.
    pub username: String,
}
