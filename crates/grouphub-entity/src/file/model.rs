//! File metadata entity model.
//!
//! Byte storage is external; only the metadata row with its path-based
//! address is kept here, so that structural edits to ancestor directories
//! can keep `file_path` consistent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata for a file stored under a group's directory tree.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileEntry {
    /// Unique file identifier.
    pub id: Uuid,
    /// The owning group.
    pub group_id: Uuid,
    /// File name (the final path segment).
    pub name: String,
    /// Full slash-delimited path, consistent with ancestor directory paths.
    pub file_path: String,
    /// Size in bytes as reported at registration.
    pub size_bytes: i64,
    /// The user who registered the file.
    pub created_by: Uuid,
    /// When the file was registered.
    pub created_at: DateTime<Utc>,
}
