pub mod model;
pub mod role;

pub use model::{GroupMemberView, Membership};
pub use role::GroupRole;
