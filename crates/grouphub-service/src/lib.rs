//! # grouphub-service
//!
//! Business logic service layer for GroupHub. Each service orchestrates the
//! injected store traits to implement one application-level concern; the
//! authorization engine is the shared gate every mutating operation passes
//! through before touching state.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod authorization;
pub mod context;
pub mod directory;
pub mod group;
pub mod membership;
pub mod notification;
pub mod permission;

pub use authorization::AuthorizationEngine;
pub use context::RequestContext;
pub use directory::DirectoryService;
pub use group::GroupService;
pub use membership::MembershipService;
pub use notification::NotificationEmitter;
pub use permission::PermissionService;
