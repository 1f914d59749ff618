//! Dependency-inversion traits.
//!
//! Components receive these as injected `Arc<dyn ...>` handles rather than
//! reaching for process-wide singletons.

pub mod identity;
pub mod notify;

pub use identity::IdentityVerifier;
pub use notify::NotificationSink;
