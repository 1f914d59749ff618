//! Directory store with subtree cascades.
//!
//! Rename, move, copy, and delete operate on a whole subtree at once.
//! Every cascade runs inside a single transaction so descendant paths are
//! never observed half-rewritten. Descendants are matched with the
//! boundary-safe prefix predicate `left(path, n+1) = prefix || '/'`, which
//! keeps `/docsA` out of `/docs` cascades, and rewritten by exact prefix
//! substitution so the suffix after the subtree root survives byte for
//! byte.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use grouphub_core::error::{AppError, ErrorKind};
use grouphub_core::result::AppResult;
use grouphub_entity::directory::path;
use grouphub_entity::directory::{CreateDirectory, Directory, SubtreeCounts};
use grouphub_entity::file::FileEntry;

/// Access to directory rows and their cascades.
#[async_trait]
pub trait DirectoryStore: Send + Sync + 'static {
    /// Find a directory by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Directory>>;

    /// Find a directory by its path within a group.
    async fn find_by_path(&self, group_id: Uuid, dir_path: &str) -> AppResult<Option<Directory>>;

    /// Create a directory row.
    async fn create(&self, data: &CreateDirectory) -> AppResult<Directory>;

    /// Rewrite a subtree's root path and cascade the change to every
    /// descendant directory and file. Serves both rename and move.
    async fn relocate_subtree(
        &self,
        directory_id: Uuid,
        group_id: Uuid,
        old_path: &str,
        new_path: &str,
    ) -> AppResult<SubtreeCounts>;

    /// Delete a directory together with every descendant directory and
    /// file. A file whose path equals the directory's own path is deleted
    /// and counted too.
    async fn delete_subtree(
        &self,
        directory_id: Uuid,
        group_id: Uuid,
        dir_path: &str,
    ) -> AppResult<SubtreeCounts>;

    /// Duplicate a subtree under a new path. Copied rows are owned by
    /// `created_by`; the source is untouched.
    async fn copy_subtree(
        &self,
        source: &Directory,
        new_path: &str,
        created_by: Uuid,
    ) -> AppResult<(Directory, SubtreeCounts)>;

    /// Count the files and descendant directories under a path. The root
    /// directory is excluded; a file at exactly the root path counts.
    async fn subtree_size(&self, group_id: Uuid, dir_path: &str) -> AppResult<SubtreeCounts>;
}

/// PostgreSQL-backed directory store.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for DirectoryRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Directory>> {
        sqlx::query_as::<_, Directory>("SELECT * FROM directories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find directory", e))
    }

    async fn find_by_path(&self, group_id: Uuid, dir_path: &str) -> AppResult<Option<Directory>> {
        sqlx::query_as::<_, Directory>(
            "SELECT * FROM directories WHERE group_id = $1 AND path = $2",
        )
        .bind(group_id)
        .bind(dir_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find directory", e))
    }

    async fn create(&self, data: &CreateDirectory) -> AppResult<Directory> {
        sqlx::query_as::<_, Directory>(
            "INSERT INTO directories (group_id, name, path, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.group_id)
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("directories_group_id_path_key") =>
            {
                AppError::conflict("A directory already exists at this path")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create directory", e),
        })
    }

    async fn relocate_subtree(
        &self,
        directory_id: Uuid,
        group_id: Uuid,
        old_path: &str,
        new_path: &str,
    ) -> AppResult<SubtreeCounts> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(
            "UPDATE directories SET name = $2, path = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(directory_id)
        .bind(path::last_segment(new_path))
        .bind(new_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("directories_group_id_path_key") =>
            {
                AppError::conflict("A directory already exists at this path")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to relocate directory", e),
        })?;

        let dirs = sqlx::query(
            "UPDATE directories \
             SET path = $3 || substr(path, char_length($2) + 1), updated_at = NOW() \
             WHERE group_id = $1 AND left(path, char_length($2) + 1) = $2 || '/'",
        )
        .bind(group_id)
        .bind(old_path)
        .bind(new_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rewrite descendant paths", e)
        })?;

        let files = sqlx::query(
            "UPDATE files \
             SET file_path = $3 || substr(file_path, char_length($2) + 1) \
             WHERE group_id = $1 AND left(file_path, char_length($2) + 1) = $2 || '/'",
        )
        .bind(group_id)
        .bind(old_path)
        .bind(new_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rewrite file paths", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit relocation", e)
        })?;

        Ok(SubtreeCounts {
            files: files.rows_affected(),
            subdirectories: dirs.rows_affected(),
        })
    }

    async fn delete_subtree(
        &self,
        directory_id: Uuid,
        group_id: Uuid,
        dir_path: &str,
    ) -> AppResult<SubtreeCounts> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let files = sqlx::query(
            "DELETE FROM files \
             WHERE group_id = $1 \
               AND (file_path = $2 OR left(file_path, char_length($2) + 1) = $2 || '/')",
        )
        .bind(group_id)
        .bind(dir_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete subtree files", e)
        })?;

        let dirs = sqlx::query(
            "DELETE FROM directories \
             WHERE group_id = $1 AND left(path, char_length($2) + 1) = $2 || '/'",
        )
        .bind(group_id)
        .bind(dir_path)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete subtree directories", e)
        })?;

        sqlx::query("DELETE FROM directories WHERE id = $1")
            .bind(directory_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete directory", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit deletion", e)
        })?;

        Ok(SubtreeCounts {
            files: files.rows_affected(),
            subdirectories: dirs.rows_affected(),
        })
    }

    async fn copy_subtree(
        &self,
        source: &Directory,
        new_path: &str,
        created_by: Uuid,
    ) -> AppResult<(Directory, SubtreeCounts)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let root = sqlx::query_as::<_, Directory>(
            "INSERT INTO directories (group_id, name, path, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(source.group_id)
        .bind(path::last_segment(new_path))
        .bind(new_path)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("directories_group_id_path_key") =>
            {
                AppError::conflict("A directory already exists at this path")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to copy directory", e),
        })?;

        let descendants = sqlx::query_as::<_, Directory>(
            "SELECT * FROM directories \
             WHERE group_id = $1 AND left(path, char_length($2) + 1) = $2 || '/' \
             ORDER BY path ASC",
        )
        .bind(source.group_id)
        .bind(&source.path)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read subtree directories", e)
        })?;

        let mut subdirectories = 0u64;
        for dir in &descendants {
            let copied_path = path::rebase(&source.path, new_path, &dir.path).ok_or_else(|| {
                AppError::internal("Descendant path escaped its subtree during copy")
            })?;
            sqlx::query(
                "INSERT INTO directories (group_id, name, path, created_by) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(source.group_id)
            .bind(&dir.name)
            .bind(&copied_path)
            .bind(created_by)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to copy subtree directory", e)
            })?;
            subdirectories += 1;
        }

        let source_files = sqlx::query_as::<_, FileEntry>(
            "SELECT * FROM files \
             WHERE group_id = $1 AND left(file_path, char_length($2) + 1) = $2 || '/' \
             ORDER BY file_path ASC",
        )
        .bind(source.group_id)
        .bind(&source.path)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read subtree files", e)
        })?;

        let mut files = 0u64;
        for file in &source_files {
            let copied_path =
                path::rebase(&source.path, new_path, &file.file_path).ok_or_else(|| {
                    AppError::internal("File path escaped its subtree during copy")
                })?;
            sqlx::query(
                "INSERT INTO files (group_id, name, file_path, size_bytes, created_by) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(source.group_id)
            .bind(&file.name)
            .bind(&copied_path)
            .bind(file.size_bytes)
            .bind(created_by)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to copy subtree file", e)
            })?;
            files += 1;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit copy", e))?;

        Ok((
            root,
            SubtreeCounts {
                files,
                subdirectories,
            },
        ))
    }

    async fn subtree_size(&self, group_id: Uuid, dir_path: &str) -> AppResult<SubtreeCounts> {
        let (files, subdirectories): (i64, i64) = sqlx::query_as(
            "SELECT \
                 (SELECT COUNT(*) FROM files \
                  WHERE group_id = $1 \
                    AND (file_path = $2 OR left(file_path, char_length($2) + 1) = $2 || '/')), \
                 (SELECT COUNT(*) FROM directories \
                  WHERE group_id = $1 AND left(path, char_length($2) + 1) = $2 || '/')",
        )
        .bind(group_id)
        .bind(dir_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to measure subtree", e)
        })?;

        Ok(SubtreeCounts {
            files: files as u64,
            subdirectories: subdirectories as u64,
        })
    }
}
