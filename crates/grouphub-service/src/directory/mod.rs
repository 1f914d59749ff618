//! Directory hierarchy management.

pub mod service;

pub use service::{CascadeOutcome, DeleteOutcome, DirectoryService};
