//! Membership workflow.

pub mod service;

pub use service::MembershipService;
