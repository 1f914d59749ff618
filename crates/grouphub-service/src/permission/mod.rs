//! Capability flag grants.

pub mod service;

pub use service::{PermissionFlags, PermissionService};
