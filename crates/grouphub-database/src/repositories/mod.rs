//! Store traits and their PostgreSQL repository implementations.
//!
//! One module per aggregate. The trait is the seam the service layer
//! depends on; the `*Repository` struct is the Pg implementation handed in
//! at wiring time.

pub mod directory;
pub mod group;
pub mod invitation;
pub mod join_request;
pub mod membership;
pub mod notification;
pub mod permission;
pub mod session;
pub mod user;
