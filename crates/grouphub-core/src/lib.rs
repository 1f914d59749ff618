//! # grouphub-core
//!
//! Core crate for GroupHub. Contains the unified error system,
//! configuration schemas, domain events, and the dependency-inversion
//! traits consumed by the service layer.
//!
//! This crate has **no** internal dependencies on other GroupHub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
