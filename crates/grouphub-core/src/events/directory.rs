//! Directory hierarchy events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events produced by structural edits to a group's directory tree.
///
/// Sent to the group's admins other than the acting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectoryEvent {
    /// A directory was created.
    Created {
        /// Owning group.
        group_id: Uuid,
        /// The new directory.
        directory_id: Uuid,
        /// Its materialized path.
        path: String,
    },
    /// A directory (and its subtree) was renamed.
    Renamed {
        /// Owning group.
        group_id: Uuid,
        /// The renamed directory.
        directory_id: Uuid,
        /// Path before the rename.
        old_path: String,
        /// Path after the rename.
        new_path: String,
    },
    /// A directory (and its subtree) was moved.
    Moved {
        /// Owning group.
        group_id: Uuid,
        /// The moved directory.
        directory_id: Uuid,
        /// Path before the move.
        old_path: String,
        /// Path after the move.
        new_path: String,
    },
    /// A directory subtree was copied.
    Copied {
        /// Owning group.
        group_id: Uuid,
        /// The source directory.
        source_id: Uuid,
        /// The new directory.
        directory_id: Uuid,
        /// The new directory's path.
        path: String,
    },
    /// A directory subtree was deleted.
    Deleted {
        /// Owning group.
        group_id: Uuid,
        /// The deleted directory.
        directory_id: Uuid,
        /// The deleted path.
        path: String,
    },
}
