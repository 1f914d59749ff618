//! In-memory store doubles and a pre-wired service stack for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use grouphub_core::events::DomainEvent;
use grouphub_core::result::AppResult;
use grouphub_core::traits::NotificationSink;
use grouphub_core::AppError;
use grouphub_database::repositories::directory::DirectoryStore;
use grouphub_database::repositories::group::GroupStore;
use grouphub_database::repositories::invitation::InvitationStore;
use grouphub_database::repositories::join_request::JoinRequestStore;
use grouphub_database::repositories::membership::MembershipStore;
use grouphub_database::repositories::permission::PermissionStore;
use grouphub_database::repositories::user::UserStore;
use grouphub_entity::directory::path;
use grouphub_entity::directory::{CreateDirectory, Directory, SubtreeCounts};
use grouphub_entity::file::FileEntry;
use grouphub_entity::group::{CreateGroup, Group, GroupSummary};
use grouphub_entity::invitation::{Invitation, InvitationStatus};
use grouphub_entity::join_request::{JoinRequest, JoinRequestStatus, JoinRequestView};
use grouphub_entity::membership::{GroupMemberView, GroupRole, Membership};
use grouphub_entity::permission::Permission;
use grouphub_entity::user::User;
use grouphub_service::{
    AuthorizationEngine, DirectoryService, GroupService, MembershipService, NotificationEmitter,
    PermissionService, RequestContext,
};

/// Records every emitted (recipient, event) pair.
#[derive(Default)]
pub struct RecordingSink {
    pub emitted: Mutex<Vec<(Uuid, DomainEvent)>>,
}

impl RecordingSink {
    pub fn recipients(&self) -> Vec<Uuid> {
        self.emitted
            .lock()
            .unwrap()
            .iter()
            .map(|(recipient, _)| *recipient)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.emitted.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn emit(&self, recipient_id: Uuid, event: &DomainEvent) -> AppResult<()> {
        self.emitted
            .lock()
            .unwrap()
            .push((recipient_id, event.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemGroupStore {
    groups: Mutex<Vec<Group>>,
}

#[async_trait]
impl GroupStore for MemGroupStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Group>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == id)
            .cloned())
    }

    async fn create(&self, data: &CreateGroup) -> AppResult<Group> {
        let group = Group {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };
        self.groups.lock().unwrap().push(group.clone());
        Ok(group)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<GroupSummary>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.owner_id == user_id)
            .map(|g| GroupSummary {
                group_id: g.id,
                name: g.name.clone(),
                description: g.description.clone(),
                role: "admin".to_string(),
                member_count: 1,
                created_at: g.created_at,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MemMembershipStore {
    rows: Mutex<Vec<Membership>>,
}

#[async_trait]
impl MembershipStore for MemMembershipStore {
    async fn find(&self, group_id: Uuid, user_id: Uuid) -> AppResult<Option<Membership>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
            .cloned())
    }

    async fn create(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupRole,
    ) -> AppResult<Membership> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|m| m.group_id == group_id && m.user_id == user_id)
        {
            return Err(AppError::conflict("User is already a member of this group"));
        }
        let membership = Membership {
            id: Uuid::new_v4(),
            group_id,
            user_id,
            role,
            joined_at: Utc::now(),
        };
        rows.push(membership.clone());
        Ok(membership)
    }

    async fn delete(&self, group_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| !(m.group_id == group_id && m.user_id == user_id));
        Ok(rows.len() < before)
    }

    async fn admin_ids(&self, group_id: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.group_id == group_id && m.role == GroupRole::Admin)
            .map(|m| m.user_id)
            .collect())
    }

    async fn list_members(&self, group_id: Uuid) -> AppResult<Vec<GroupMemberView>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.group_id == group_id)
            .map(|m| GroupMemberView {
                user_id: m.user_id,
                username: format!("user-{}", m.user_id),
                full_name: None,
                role: m.role,
                joined_at: m.joined_at,
            })
            .collect())
    }
}

#[derive(Default)]
pub struct MemJoinRequestStore {
    rows: Mutex<Vec<JoinRequest>>,
}

#[async_trait]
impl JoinRequestStore for MemJoinRequestStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JoinRequest>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_pending(&self, group_id: Uuid, user_id: Uuid) -> AppResult<Option<JoinRequest>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.group_id == group_id
                    && r.user_id == user_id
                    && r.status == JoinRequestStatus::Pending
            })
            .cloned())
    }

    async fn create(&self, group_id: Uuid, user_id: Uuid) -> AppResult<JoinRequest> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| {
            r.group_id == group_id && r.user_id == user_id && r.status == JoinRequestStatus::Pending
        }) {
            return Err(AppError::conflict(
                "A join request is already pending for this group",
            ));
        }
        let request = JoinRequest {
            id: Uuid::new_v4(),
            group_id,
            user_id,
            status: JoinRequestStatus::Pending,
            reviewed_by: None,
            created_at: Utc::now(),
            reviewed_at: None,
        };
        rows.push(request.clone());
        Ok(request)
    }

    async fn list_pending(&self, group_id: Uuid) -> AppResult<Vec<JoinRequestView>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.group_id == group_id && r.status == JoinRequestStatus::Pending)
            .map(|r| JoinRequestView {
                request_id: r.id,
                user_id: r.user_id,
                username: format!("user-{}", r.user_id),
                full_name: None,
                status: r.status,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn resolve(
        &self,
        request_id: Uuid,
        status: JoinRequestStatus,
        reviewed_by: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|r| r.id == request_id && r.status == JoinRequestStatus::Pending)
        {
            Some(row) => {
                row.status = status;
                row.reviewed_by = Some(reviewed_by);
                row.reviewed_at = Some(reviewed_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemInvitationStore {
    rows: Mutex<Vec<Invitation>>,
}

#[async_trait]
impl InvitationStore for MemInvitationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invitation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn find_pending(
        &self,
        group_id: Uuid,
        invitee_id: Uuid,
    ) -> AppResult<Option<Invitation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|i| {
                i.group_id == group_id
                    && i.invitee_id == invitee_id
                    && i.status == InvitationStatus::Pending
            })
            .cloned())
    }

    async fn create(
        &self,
        group_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
    ) -> AppResult<Invitation> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|i| {
            i.group_id == group_id
                && i.invitee_id == invitee_id
                && i.status == InvitationStatus::Pending
        }) {
            return Err(AppError::conflict(
                "An invitation is already pending for this user",
            ));
        }
        let invitation = Invitation {
            id: Uuid::new_v4(),
            group_id,
            inviter_id,
            invitee_id,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        rows.push(invitation.clone());
        Ok(invitation)
    }

    async fn resolve(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
        responded_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|i| i.id == invitation_id && i.status == InvitationStatus::Pending)
        {
            Some(row) => {
                row.status = status;
                row.responded_at = Some(responded_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemPermissionStore {
    rows: Mutex<Vec<Permission>>,
}

#[async_trait]
impl PermissionStore for MemPermissionStore {
    async fn find(&self, user_id: Uuid, group_id: Uuid) -> AppResult<Option<Permission>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.group_id == group_id)
            .cloned())
    }

    async fn upsert(&self, permission: &Permission) -> AppResult<Permission> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|p| !(p.user_id == permission.user_id && p.group_id == permission.group_id));
        rows.push(permission.clone());
        Ok(permission.clone())
    }

    async fn delete(&self, user_id: Uuid, group_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !(p.user_id == user_id && p.group_id == group_id));
        Ok(rows.len() < before)
    }
}

#[derive(Default)]
pub struct MemUserStore {
    users: Mutex<Vec<User>>,
}

impl MemUserStore {
    pub fn seed(&self, username: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: None,
            full_name: None,
            created_at: Utc::now(),
        };
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }
}

#[async_trait]
impl UserStore for MemUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory tree mirroring the boundary-safe prefix semantics of the SQL
/// cascades.
#[derive(Default)]
pub struct MemDirectoryStore {
    pub directories: Mutex<Vec<Directory>>,
    pub files: Mutex<Vec<FileEntry>>,
}

impl MemDirectoryStore {
    pub fn seed_file(&self, group_id: Uuid, file_path: &str, created_by: Uuid) {
        self.files.lock().unwrap().push(FileEntry {
            id: Uuid::new_v4(),
            group_id,
            name: path::last_segment(file_path).to_string(),
            file_path: file_path.to_string(),
            size_bytes: 0,
            created_by,
            created_at: Utc::now(),
        });
    }

    pub fn directory_paths(&self, group_id: Uuid) -> Vec<String> {
        let mut paths: Vec<String> = self
            .directories
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.group_id == group_id)
            .map(|d| d.path.clone())
            .collect();
        paths.sort();
        paths
    }

    pub fn file_paths(&self, group_id: Uuid) -> Vec<String> {
        let mut paths: Vec<String> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.group_id == group_id)
            .map(|f| f.file_path.clone())
            .collect();
        paths.sort();
        paths
    }

    fn is_strict_descendant(prefix: &str, candidate: &str) -> bool {
        candidate != prefix && path::is_within(prefix, candidate)
    }
}

#[async_trait]
impl DirectoryStore for MemDirectoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Directory>> {
        Ok(self
            .directories
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn find_by_path(&self, group_id: Uuid, dir_path: &str) -> AppResult<Option<Directory>> {
        Ok(self
            .directories
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.group_id == group_id && d.path == dir_path)
            .cloned())
    }

    async fn create(&self, data: &CreateDirectory) -> AppResult<Directory> {
        let mut dirs = self.directories.lock().unwrap();
        if dirs
            .iter()
            .any(|d| d.group_id == data.group_id && d.path == data.path)
        {
            return Err(AppError::conflict("A directory already exists at this path"));
        }
        let now = Utc::now();
        let directory = Directory {
            id: Uuid::new_v4(),
            group_id: data.group_id,
            name: data.name.clone(),
            path: data.path.clone(),
            created_by: data.created_by,
            created_at: now,
            updated_at: now,
        };
        dirs.push(directory.clone());
        Ok(directory)
    }

    async fn relocate_subtree(
        &self,
        directory_id: Uuid,
        group_id: Uuid,
        old_path: &str,
        new_path: &str,
    ) -> AppResult<SubtreeCounts> {
        let mut dirs = self.directories.lock().unwrap();
        if dirs
            .iter()
            .any(|d| d.group_id == group_id && d.path == new_path && d.id != directory_id)
        {
            return Err(AppError::conflict("A directory already exists at this path"));
        }
        let mut subdirectories = 0u64;
        for dir in dirs.iter_mut().filter(|d| d.group_id == group_id) {
            if dir.id == directory_id {
                dir.path = new_path.to_string();
                dir.name = path::last_segment(new_path).to_string();
                dir.updated_at = Utc::now();
            } else if Self::is_strict_descendant(old_path, &dir.path) {
                if let Some(rebased) = path::rebase(old_path, new_path, &dir.path) {
                    dir.path = rebased;
                    dir.updated_at = Utc::now();
                    subdirectories += 1;
                }
            }
        }
        let mut files = 0u64;
        for file in self
            .files
            .lock()
            .unwrap()
            .iter_mut()
            .filter(|f| f.group_id == group_id)
        {
            if Self::is_strict_descendant(old_path, &file.file_path) {
                if let Some(rebased) = path::rebase(old_path, new_path, &file.file_path) {
                    file.file_path = rebased;
                    files += 1;
                }
            }
        }
        Ok(SubtreeCounts {
            files,
            subdirectories,
        })
    }

    async fn delete_subtree(
        &self,
        directory_id: Uuid,
        group_id: Uuid,
        dir_path: &str,
    ) -> AppResult<SubtreeCounts> {
        let files_deleted = {
            let mut files = self.files.lock().unwrap();
            let before = files.len();
            // Files at exactly the directory's path go with it.
            files.retain(|f| !(f.group_id == group_id && path::is_within(dir_path, &f.file_path)));
            (before - files.len()) as u64
        };
        let mut dirs = self.directories.lock().unwrap();
        let before = dirs.len();
        dirs.retain(|d| {
            !(d.group_id == group_id && Self::is_strict_descendant(dir_path, &d.path))
                && d.id != directory_id
        });
        let subdirectories = (before - dirs.len()) as u64 - 1;
        Ok(SubtreeCounts {
            files: files_deleted,
            subdirectories,
        })
    }

    async fn copy_subtree(
        &self,
        source: &Directory,
        new_path: &str,
        created_by: Uuid,
    ) -> AppResult<(Directory, SubtreeCounts)> {
        let root = self
            .create(&CreateDirectory {
                group_id: source.group_id,
                name: path::last_segment(new_path).to_string(),
                path: new_path.to_string(),
                created_by,
            })
            .await?;

        let descendant_dirs: Vec<Directory> = self
            .directories
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.group_id == source.group_id && Self::is_strict_descendant(&source.path, &d.path)
            })
            .cloned()
            .collect();
        let mut subdirectories = 0u64;
        for dir in descendant_dirs {
            if let Some(rebased) = path::rebase(&source.path, new_path, &dir.path) {
                self.create(&CreateDirectory {
                    group_id: source.group_id,
                    name: dir.name.clone(),
                    path: rebased,
                    created_by,
                })
                .await?;
                subdirectories += 1;
            }
        }

        let descendant_files: Vec<FileEntry> = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| {
                f.group_id == source.group_id
                    && Self::is_strict_descendant(&source.path, &f.file_path)
            })
            .cloned()
            .collect();
        let mut files = 0u64;
        for file in descendant_files {
            if let Some(rebased) = path::rebase(&source.path, new_path, &file.file_path) {
                self.seed_file(source.group_id, &rebased, created_by);
                files += 1;
            }
        }

        Ok((
            root,
            SubtreeCounts {
                files,
                subdirectories,
            },
        ))
    }

    async fn subtree_size(&self, group_id: Uuid, dir_path: &str) -> AppResult<SubtreeCounts> {
        let files = self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.group_id == group_id && path::is_within(dir_path, &f.file_path))
            .count() as u64;
        let subdirectories = self
            .directories
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.group_id == group_id && Self::is_strict_descendant(dir_path, &d.path))
            .count() as u64;
        Ok(SubtreeCounts {
            files,
            subdirectories,
        })
    }
}

/// A fully wired in-memory service stack.
pub struct TestWorld {
    pub groups: Arc<MemGroupStore>,
    pub memberships: Arc<MemMembershipStore>,
    pub join_requests: Arc<MemJoinRequestStore>,
    pub invitations: Arc<MemInvitationStore>,
    pub permissions: Arc<MemPermissionStore>,
    pub users: Arc<MemUserStore>,
    pub directories: Arc<MemDirectoryStore>,
    pub sink: Arc<RecordingSink>,
    pub auth: AuthorizationEngine,
    pub membership_service: MembershipService,
    pub directory_service: DirectoryService,
    pub group_service: GroupService,
    pub permission_service: PermissionService,
}

impl TestWorld {
    pub fn new() -> Self {
        let groups = Arc::new(MemGroupStore::default());
        let memberships = Arc::new(MemMembershipStore::default());
        let join_requests = Arc::new(MemJoinRequestStore::default());
        let invitations = Arc::new(MemInvitationStore::default());
        let permissions = Arc::new(MemPermissionStore::default());
        let users = Arc::new(MemUserStore::default());
        let directories = Arc::new(MemDirectoryStore::default());
        let sink = Arc::new(RecordingSink::default());

        let auth = AuthorizationEngine::new(
            groups.clone(),
            memberships.clone(),
            permissions.clone(),
        );
        let emitter = NotificationEmitter::new(sink.clone());
        let membership_service = MembershipService::new(
            auth.clone(),
            join_requests.clone(),
            invitations.clone(),
            memberships.clone(),
            permissions.clone(),
            users.clone(),
            emitter.clone(),
        );
        let directory_service =
            DirectoryService::new(auth.clone(), directories.clone(), emitter.clone());
        let group_service = GroupService::new(
            auth.clone(),
            groups.clone(),
            memberships.clone(),
            permissions.clone(),
        );
        let permission_service = PermissionService::new(auth.clone(), permissions.clone());

        Self {
            groups,
            memberships,
            join_requests,
            invitations,
            permissions,
            users,
            directories,
            sink,
            auth,
            membership_service,
            directory_service,
            group_service,
            permission_service,
        }
    }

    pub fn ctx(&self, user_id: Uuid, username: &str) -> RequestContext {
        RequestContext::new(user_id, username.to_string())
    }

    /// Seed a user plus a group they own, with the owner's membership and
    /// permission rows as group creation would produce them.
    pub async fn seed_group(&self, owner_username: &str) -> (Uuid, Group) {
        let owner_id = self.users.seed(owner_username);
        let ctx = self.ctx(owner_id, owner_username);
        let group = self
            .group_service
            .create_group(&ctx, &format!("{owner_username}'s group"), "")
            .await
            .unwrap();
        (owner_id, group)
    }

    /// Seed a plain member of a group.
    pub async fn seed_member(&self, group_id: Uuid, username: &str) -> Uuid {
        let user_id = self.users.seed(username);
        self.memberships
            .create(group_id, user_id, GroupRole::Member)
            .await
            .unwrap();
        self.permissions
            .upsert(&Permission::member_default(user_id, group_id))
            .await
            .unwrap();
        user_id
    }
}
