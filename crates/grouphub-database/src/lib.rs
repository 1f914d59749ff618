//! # grouphub-database
//!
//! PostgreSQL access layer for GroupHub. `connection` manages the pool,
//! `migration` applies the embedded schema, and each `repositories`
//! sub-module declares the injectable store trait for one aggregate next
//! to its Pg implementation.

pub mod connection;
pub mod migration;
pub mod repositories;
