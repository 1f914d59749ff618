//! Group-scoped directory tree operations.
//!
//! Structural edits (rename, move, copy, delete) act on whole subtrees.
//! The store applies each cascade in one transaction; this layer computes
//! target paths with the path algebra and enforces the gates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use grouphub_core::events::{DirectoryEvent, EventPayload};
use grouphub_core::{AppError, AppResult};
use grouphub_database::repositories::directory::DirectoryStore;
use grouphub_entity::directory::path;
use grouphub_entity::directory::{CreateDirectory, Directory, SubtreeCounts};
use grouphub_entity::group::Group;

use crate::authorization::AuthorizationEngine;
use crate::context::RequestContext;
use crate::notification::NotificationEmitter;

/// A structural edit's result: the directory in its new state plus the
/// descendant rows the cascade touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// The directory after the edit (for copy, the new directory).
    pub directory: Directory,
    /// Descendant rows affected by the cascade.
    pub affected: SubtreeCounts,
}

/// A recursive delete's result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutcome {
    /// The deleted directory's ID.
    pub directory_id: Uuid,
    /// The deleted directory's path.
    pub path: String,
    /// Descendant rows deleted alongside the root.
    pub deleted: SubtreeCounts,
}

/// Manages the path-addressed directory tree of each group.
#[derive(Clone)]
pub struct DirectoryService {
    auth: AuthorizationEngine,
    directories: Arc<dyn DirectoryStore>,
    emitter: NotificationEmitter,
}

impl DirectoryService {
    /// Creates a new directory service.
    pub fn new(
        auth: AuthorizationEngine,
        directories: Arc<dyn DirectoryStore>,
        emitter: NotificationEmitter,
    ) -> Self {
        Self {
            auth,
            directories,
            emitter,
        }
    }

    /// Create a directory under a parent path. Member only.
    pub async fn create_directory(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        name: &str,
        parent_path: &str,
    ) -> AppResult<Directory> {
        let group = self.auth.require_group(group_id).await?;
        self.auth.require_member(ctx.user_id, &group).await?;
        path::validate_name(name)?;

        let parent = path::normalize(parent_path);
        if parent != "/" {
            self.directories
                .find_by_path(group.id, &parent)
                .await?
                .ok_or_else(|| AppError::not_found("Parent directory not found"))?;
        }

        let directory = self
            .directories
            .create(&CreateDirectory {
                group_id: group.id,
                name: name.trim().to_string(),
                path: path::join(&parent, name.trim()),
                created_by: ctx.user_id,
            })
            .await?;
        info!(directory_id = %directory.id, path = %directory.path, "Directory created");

        self.notify_admins(
            ctx,
            &group,
            DirectoryEvent::Created {
                group_id: group.id,
                directory_id: directory.id,
                path: directory.path.clone(),
            },
        )
        .await;

        Ok(directory)
    }

    /// Rename a directory, cascading the path rewrite to every descendant.
    /// Admin only.
    pub async fn rename_directory(
        &self,
        ctx: &RequestContext,
        directory_id: Uuid,
        new_name: &str,
    ) -> AppResult<CascadeOutcome> {
        let directory = self.require_directory(directory_id).await?;
        let group = self.auth.require_group(directory.group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;
        path::validate_name(new_name)?;

        let old_path = directory.path.clone();
        let new_path = path::with_last_segment(&old_path, new_name.trim());
        let affected = self
            .directories
            .relocate_subtree(directory.id, group.id, &old_path, &new_path)
            .await?;
        info!(directory_id = %directory.id, %old_path, %new_path, "Directory renamed");

        self.notify_admins(
            ctx,
            &group,
            DirectoryEvent::Renamed {
                group_id: group.id,
                directory_id: directory.id,
                old_path,
                new_path: new_path.clone(),
            },
        )
        .await;

        Ok(CascadeOutcome {
            directory: Directory {
                name: new_name.trim().to_string(),
                path: new_path,
                ..directory
            },
            affected,
        })
    }

    /// Move a directory under a new parent, cascading the path rewrite.
    /// Admin only; a directory cannot be moved into its own subtree.
    pub async fn move_directory(
        &self,
        ctx: &RequestContext,
        directory_id: Uuid,
        destination_path: &str,
    ) -> AppResult<CascadeOutcome> {
        let directory = self.require_directory(directory_id).await?;
        let group = self.auth.require_group(directory.group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;

        let destination = path::normalize(destination_path);
        if destination != "/" {
            self.directories
                .find_by_path(group.id, &destination)
                .await?
                .ok_or_else(|| AppError::not_found("Destination directory not found"))?;
        }
        if path::is_within(&directory.path, &destination) {
            return Err(AppError::validation(
                "Cannot move a directory into its own subtree",
            ));
        }

        let old_path = directory.path.clone();
        let new_path = path::join(&destination, &directory.name);
        let affected = self
            .directories
            .relocate_subtree(directory.id, group.id, &old_path, &new_path)
            .await?;
        info!(directory_id = %directory.id, %old_path, %new_path, "Directory moved");

        self.notify_admins(
            ctx,
            &group,
            DirectoryEvent::Moved {
                group_id: group.id,
                directory_id: directory.id,
                old_path,
                new_path: new_path.clone(),
            },
        )
        .await;

        Ok(CascadeOutcome {
            directory: Directory {
                path: new_path,
                ..directory
            },
            affected,
        })
    }

    /// Copy a directory subtree under a destination path. Admin only.
    ///
    /// The copy is deep: descendant directories and files are duplicated
    /// with their paths rebased onto the new root. The source is untouched.
    pub async fn copy_directory(
        &self,
        ctx: &RequestContext,
        directory_id: Uuid,
        destination_path: &str,
    ) -> AppResult<CascadeOutcome> {
        let directory = self.require_directory(directory_id).await?;
        let group = self.auth.require_group(directory.group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;

        let destination = path::normalize(destination_path);
        if destination != "/" {
            self.directories
                .find_by_path(group.id, &destination)
                .await?
                .ok_or_else(|| AppError::not_found("Destination directory not found"))?;
        }
        let new_path = path::join(&destination, &directory.name);
        if path::is_within(&directory.path, &new_path) {
            return Err(AppError::validation(
                "Cannot copy a directory into its own subtree",
            ));
        }

        let (copy, affected) = self
            .directories
            .copy_subtree(&directory, &new_path, ctx.user_id)
            .await?;
        info!(source_id = %directory.id, copy_id = %copy.id, path = %copy.path, "Directory copied");

        self.notify_admins(
            ctx,
            &group,
            DirectoryEvent::Copied {
                group_id: group.id,
                source_id: directory.id,
                directory_id: copy.id,
                path: copy.path.clone(),
            },
        )
        .await;

        Ok(CascadeOutcome {
            directory: copy,
            affected,
        })
    }

    /// Delete a directory subtree. Admin only.
    ///
    /// Without `recursive`, a non-empty directory is refused with a
    /// conflict; nothing short of the whole subtree is ever deleted.
    pub async fn delete_directory(
        &self,
        ctx: &RequestContext,
        directory_id: Uuid,
        recursive: bool,
    ) -> AppResult<DeleteOutcome> {
        let directory = self.require_directory(directory_id).await?;
        let group = self.auth.require_group(directory.group_id).await?;
        self.auth.require_admin(ctx.user_id, &group).await?;

        if !recursive {
            let size = self.directories.subtree_size(group.id, &directory.path).await?;
            if !size.is_empty() {
                return Err(AppError::conflict(
                    "Directory is not empty; set recursive to delete its contents",
                ));
            }
        }

        let deleted = self
            .directories
            .delete_subtree(directory.id, group.id, &directory.path)
            .await?;
        info!(directory_id = %directory.id, path = %directory.path, ?deleted, "Directory deleted");

        self.notify_admins(
            ctx,
            &group,
            DirectoryEvent::Deleted {
                group_id: group.id,
                directory_id: directory.id,
                path: directory.path.clone(),
            },
        )
        .await;

        Ok(DeleteOutcome {
            directory_id: directory.id,
            path: directory.path,
            deleted,
        })
    }

    async fn require_directory(&self, directory_id: Uuid) -> AppResult<Directory> {
        self.directories
            .find_by_id(directory_id)
            .await?
            .ok_or_else(|| AppError::not_found("Directory not found"))
    }

    async fn notify_admins(&self, ctx: &RequestContext, group: &Group, event: DirectoryEvent) {
        match self.auth.admin_recipients(group, ctx.user_id).await {
            Ok(admins) => {
                self.emitter
                    .emit(ctx.user_id, &admins, EventPayload::Directory(event))
                    .await;
            }
            Err(e) => {
                tracing::warn!(group_id = %group.id, error = %e, "Failed to resolve notification recipients");
            }
        }
    }
}
