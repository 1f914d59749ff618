//! GroupHub Server — Group Authorization & Hierarchical Resource Management
//!
//! Main entry point that wires all crates together and starts the command
//! server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use grouphub_core::config::AppConfig;
use grouphub_core::error::AppError;
use grouphub_database::connection::DatabasePool;
use grouphub_database::repositories::directory::DirectoryRepository;
use grouphub_database::repositories::group::GroupRepository;
use grouphub_database::repositories::invitation::InvitationRepository;
use grouphub_database::repositories::join_request::JoinRequestRepository;
use grouphub_database::repositories::membership::MembershipRepository;
use grouphub_database::repositories::notification::OutboxNotificationSink;
use grouphub_database::repositories::permission::PermissionRepository;
use grouphub_database::repositories::session::SessionRepository;
use grouphub_database::repositories::user::UserRepository;
use grouphub_protocol::{Dispatcher, ProtocolServer};
use grouphub_service::{
    AuthorizationEngine, DirectoryService, GroupService, MembershipService, NotificationEmitter,
    PermissionService,
};

#[tokio::main]
async fn main() {
    let env = std::env::var("GROUPHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting GroupHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    grouphub_database::migration::run_migrations(db.pool()).await?;
    let pool = db.into_pool();

    // ── Step 2: Initialize repositories ──────────────────────────
    let group_repo = Arc::new(GroupRepository::new(pool.clone()));
    let membership_repo = Arc::new(MembershipRepository::new(pool.clone()));
    let join_request_repo = Arc::new(JoinRequestRepository::new(pool.clone()));
    let invitation_repo = Arc::new(InvitationRepository::new(pool.clone()));
    let permission_repo = Arc::new(PermissionRepository::new(pool.clone()));
    let directory_repo = Arc::new(DirectoryRepository::new(pool.clone()));
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let session_repo = Arc::new(SessionRepository::new(pool.clone()));
    let outbox_sink = Arc::new(OutboxNotificationSink::new(pool.clone()));

    // ── Step 3: Initialize services ──────────────────────────────
    let auth = AuthorizationEngine::new(
        group_repo.clone(),
        membership_repo.clone(),
        permission_repo.clone(),
    );
    let emitter = NotificationEmitter::new(outbox_sink);
    let membership_service = MembershipService::new(
        auth.clone(),
        join_request_repo,
        invitation_repo,
        membership_repo.clone(),
        permission_repo.clone(),
        user_repo,
        emitter.clone(),
    );
    let directory_service = DirectoryService::new(auth.clone(), directory_repo, emitter.clone());
    let group_service = GroupService::new(
        auth.clone(),
        group_repo,
        membership_repo,
        permission_repo.clone(),
    );
    let permission_service = PermissionService::new(auth, permission_repo);

    let dispatcher = Arc::new(Dispatcher::new(
        session_repo,
        membership_service,
        directory_service,
        group_service,
        permission_service,
    ));

    // ── Step 4: Start server with graceful shutdown ──────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let server = ProtocolServer::new(config.server, dispatcher);

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server.run(shutdown_rx).await?;

    // In-flight connections observe the signal at their next request
    // boundary; give them a moment before the pool goes away.
    tokio::time::sleep(grace.min(std::time::Duration::from_secs(5))).await;
    pool.close().await;

    tracing::info!("GroupHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
