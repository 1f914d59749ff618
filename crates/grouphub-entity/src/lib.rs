//! # grouphub-entity
//!
//! Domain entity models for GroupHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod directory;
pub mod file;
pub mod group;
pub mod invitation;
pub mod join_request;
pub mod membership;
pub mod permission;
pub mod user;
