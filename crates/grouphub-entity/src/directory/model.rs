//! Directory entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A directory in a group's virtual tree.
///
/// Invariant: `path` equals the parent's path joined with `name`, and is
/// unique within the group. Structural edits must rewrite every descendant
/// path by prefix substitution so the invariant survives rename and move.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Directory {
    /// Unique directory identifier.
    pub id: Uuid,
    /// The owning group.
    pub group_id: Uuid,
    /// Directory name (the final path segment).
    pub name: String,
    /// Full slash-delimited materialized path (e.g. `/reports/q1`).
    pub path: String,
    /// The user who created the directory.
    pub created_by: Uuid,
    /// When the directory was created.
    pub created_at: DateTime<Utc>,
    /// When the directory was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Row counts affected by a subtree cascade (rename, move, copy, delete).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtreeCounts {
    /// Files whose paths were rewritten, copied, or deleted.
    pub files: u64,
    /// Descendant directories affected (the subtree root excluded).
    pub subdirectories: u64,
}

impl SubtreeCounts {
    /// Whether the subtree had any content besides its root.
    pub fn is_empty(&self) -> bool {
        self.files == 0 && self.subdirectories == 0
    }
}

/// Data required to create a new directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDirectory {
    /// The owning group.
    pub group_id: Uuid,
    /// Directory name.
    pub name: String,
    /// Full materialized path.
    pub path: String,
    /// The creating user.
    pub created_by: Uuid,
}
