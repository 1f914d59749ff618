//! Group lifecycle and listings.

pub mod service;

pub use service::GroupService;
