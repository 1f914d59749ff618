//! Integration tests for the directory hierarchy manager.

mod helpers;

use grouphub_core::error::ErrorKind;
use grouphub_database::repositories::directory::DirectoryStore;
use grouphub_database::repositories::membership::MembershipStore;
use uuid::Uuid;

use helpers::TestWorld;

async fn seed_tree(world: &TestWorld) -> (Uuid, Uuid, grouphub_entity::directory::Directory) {
    let (owner, group) = world.seed_group("alice").await;
    let ctx = world.ctx(owner, "alice");
    let reports = world
        .directory_service
        .create_directory(&ctx, group.id, "reports", "/")
        .await
        .unwrap();
    world
        .directory_service
        .create_directory(&ctx, group.id, "q1", "/reports")
        .await
        .unwrap();
    world
        .directory_service
        .create_directory(&ctx, group.id, "w2", "/reports/q1")
        .await
        .unwrap();
    world
        .directories
        .seed_file(group.id, "/reports/q1/summary.pdf", owner);
    (owner, group.id, reports)
}

#[tokio::test]
async fn test_create_directory_builds_materialized_path() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;
    let ctx = world.ctx(owner, "alice");

    let reports = world
        .directory_service
        .create_directory(&ctx, group.id, "reports", "/")
        .await
        .unwrap();
    let q1 = world
        .directory_service
        .create_directory(&ctx, group.id, "q1", "/reports")
        .await
        .unwrap();

    assert_eq!(reports.path, "/reports");
    assert_eq!(q1.path, "/reports/q1");
}

#[tokio::test]
async fn test_create_under_missing_parent_is_not_found() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;

    let err = world
        .directory_service
        .create_directory(&world.ctx(owner, "alice"), group.id, "q1", "/missing")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_duplicate_path_is_conflict() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;
    let ctx = world.ctx(owner, "alice");

    world
        .directory_service
        .create_directory(&ctx, group.id, "reports", "/")
        .await
        .unwrap();
    let err = world
        .directory_service
        .create_directory(&ctx, group.id, "reports", "/")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_create_rejects_slash_in_name() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;

    let err = world
        .directory_service
        .create_directory(&world.ctx(owner, "alice"), group.id, "a/b", "/")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_non_member_cannot_create() {
    let world = TestWorld::new();
    let (_owner, group) = world.seed_group("alice").await;
    let mallory = world.users.seed("mallory");

    let err = world
        .directory_service
        .create_directory(&world.ctx(mallory, "mallory"), group.id, "x", "/")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_rename_rewrites_descendants_by_prefix_substitution() {
    let world = TestWorld::new();
    let (owner, group_id, reports) = seed_tree(&world).await;

    let outcome = world
        .directory_service
        .rename_directory(&world.ctx(owner, "alice"), reports.id, "archive")
        .await
        .unwrap();

    assert_eq!(outcome.directory.path, "/archive");
    assert_eq!(outcome.affected.subdirectories, 2);
    assert_eq!(outcome.affected.files, 1);
    assert_eq!(
        world.directories.directory_paths(group_id),
        vec!["/archive", "/archive/q1", "/archive/q1/w2"]
    );
    assert_eq!(
        world.directories.file_paths(group_id),
        vec!["/archive/q1/summary.pdf"]
    );
}

#[tokio::test]
async fn test_rename_round_trip_restores_original_paths() {
    let world = TestWorld::new();
    let (owner, group_id, reports) = seed_tree(&world).await;
    let ctx = world.ctx(owner, "alice");
    let original = world.directories.directory_paths(group_id);

    world
        .directory_service
        .rename_directory(&ctx, reports.id, "archive")
        .await
        .unwrap();
    world
        .directory_service
        .rename_directory(&ctx, reports.id, "reports")
        .await
        .unwrap();

    assert_eq!(world.directories.directory_paths(group_id), original);
    assert_eq!(
        world.directories.file_paths(group_id),
        vec!["/reports/q1/summary.pdf"]
    );
}

#[tokio::test]
async fn test_rename_by_plain_member_is_forbidden() {
    let world = TestWorld::new();
    let (_owner, group_id, reports) = seed_tree(&world).await;
    let bob = world.seed_member(group_id, "bob").await;

    let err = world
        .directory_service
        .rename_directory(&world.ctx(bob, "bob"), reports.id, "mine")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_move_cascades_and_reports_counts() {
    let world = TestWorld::new();
    let (owner, group_id, _reports) = seed_tree(&world).await;
    let ctx = world.ctx(owner, "alice");
    let q1 = world
        .directories
        .find_by_path(group_id, "/reports/q1")
        .await
        .unwrap()
        .unwrap();
    world
        .directory_service
        .create_directory(&ctx, group_id, "attic", "/")
        .await
        .unwrap();

    let outcome = world
        .directory_service
        .move_directory(&ctx, q1.id, "/attic")
        .await
        .unwrap();

    assert_eq!(outcome.directory.path, "/attic/q1");
    assert_eq!(outcome.affected.subdirectories, 1);
    assert_eq!(outcome.affected.files, 1);
    assert_eq!(
        world.directories.file_paths(group_id),
        vec!["/attic/q1/summary.pdf"]
    );
}

#[tokio::test]
async fn test_move_into_own_subtree_is_rejected() {
    let world = TestWorld::new();
    let (owner, _group_id, reports) = seed_tree(&world).await;

    let err = world
        .directory_service
        .move_directory(&world.ctx(owner, "alice"), reports.id, "/reports/q1")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_respects_path_boundaries() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;
    let ctx = world.ctx(owner, "alice");
    let docs = world
        .directory_service
        .create_directory(&ctx, group.id, "docs", "/")
        .await
        .unwrap();
    world
        .directory_service
        .create_directory(&ctx, group.id, "docsA", "/")
        .await
        .unwrap();
    world.directories.seed_file(group.id, "/docs/a.txt", owner);
    world.directories.seed_file(group.id, "/docsA/b.txt", owner);

    let outcome = world
        .directory_service
        .delete_directory(&ctx, docs.id, true)
        .await
        .unwrap();

    assert_eq!(outcome.deleted.files, 1);
    // The sibling sharing the prefix but not the separator boundary survives.
    assert_eq!(world.directories.directory_paths(group.id), vec!["/docsA"]);
    assert_eq!(world.directories.file_paths(group.id), vec!["/docsA/b.txt"]);
}

#[tokio::test]
async fn test_delete_removes_file_at_exact_directory_path() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;
    let ctx = world.ctx(owner, "alice");
    let docs = world
        .directory_service
        .create_directory(&ctx, group.id, "docs", "/")
        .await
        .unwrap();
    world.directories.seed_file(group.id, "/docs", owner);

    let outcome = world
        .directory_service
        .delete_directory(&ctx, docs.id, true)
        .await
        .unwrap();

    assert_eq!(outcome.deleted.files, 1);
    assert!(world.directories.file_paths(group.id).is_empty());
}

#[tokio::test]
async fn test_file_at_exact_directory_path_blocks_non_recursive_delete() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;
    let ctx = world.ctx(owner, "alice");
    let docs = world
        .directory_service
        .create_directory(&ctx, group.id, "docs", "/")
        .await
        .unwrap();
    world.directories.seed_file(group.id, "/docs", owner);

    let err = world
        .directory_service
        .delete_directory(&ctx, docs.id, false)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(world.directories.file_paths(group.id), vec!["/docs"]);
}

#[tokio::test]
async fn test_non_recursive_delete_of_non_empty_directory_is_conflict() {
    let world = TestWorld::new();
    let (owner, group_id, reports) = seed_tree(&world).await;

    let err = world
        .directory_service
        .delete_directory(&world.ctx(owner, "alice"), reports.id, false)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    // Nothing was deleted.
    assert_eq!(
        world.directories.directory_paths(group_id),
        vec!["/reports", "/reports/q1", "/reports/q1/w2"]
    );
}

#[tokio::test]
async fn test_non_recursive_delete_of_empty_directory_succeeds() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;
    let ctx = world.ctx(owner, "alice");
    let empty = world
        .directory_service
        .create_directory(&ctx, group.id, "empty", "/")
        .await
        .unwrap();

    let outcome = world
        .directory_service
        .delete_directory(&ctx, empty.id, false)
        .await
        .unwrap();

    assert!(outcome.deleted.is_empty());
    assert!(world.directories.directory_paths(group.id).is_empty());
}

#[tokio::test]
async fn test_copy_is_deep_and_leaves_source_untouched() {
    let world = TestWorld::new();
    let (owner, group_id, reports) = seed_tree(&world).await;
    let ctx = world.ctx(owner, "alice");
    world
        .directory_service
        .create_directory(&ctx, group_id, "backup", "/")
        .await
        .unwrap();

    let outcome = world
        .directory_service
        .copy_directory(&ctx, reports.id, "/backup")
        .await
        .unwrap();

    assert_eq!(outcome.directory.path, "/backup/reports");
    assert_ne!(outcome.directory.id, reports.id);
    assert_eq!(outcome.affected.subdirectories, 2);
    assert_eq!(outcome.affected.files, 1);
    assert_eq!(
        world.directories.directory_paths(group_id),
        vec![
            "/backup",
            "/backup/reports",
            "/backup/reports/q1",
            "/backup/reports/q1/w2",
            "/reports",
            "/reports/q1",
            "/reports/q1/w2",
        ]
    );
    assert_eq!(
        world.directories.file_paths(group_id),
        vec!["/backup/reports/q1/summary.pdf", "/reports/q1/summary.pdf"]
    );
}

#[tokio::test]
async fn test_copy_into_own_subtree_is_rejected() {
    let world = TestWorld::new();
    let (owner, _group_id, reports) = seed_tree(&world).await;

    let err = world
        .directory_service
        .copy_directory(&world.ctx(owner, "alice"), reports.id, "/reports/q1")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_structural_edits_notify_other_admins_only() {
    let world = TestWorld::new();
    let (owner, group) = world.seed_group("alice").await;
    let bob = world.users.seed("bob");
    world
        .memberships
        .create(group.id, bob, grouphub_entity::membership::GroupRole::Admin)
        .await
        .unwrap();
    world.seed_member(group.id, "carol").await;

    world
        .directory_service
        .create_directory(&world.ctx(owner, "alice"), group.id, "reports", "/")
        .await
        .unwrap();

    // The other admin is notified; the actor and the plain member are not.
    assert_eq!(world.sink.recipients(), vec![bob]);
}
