pub mod model;

pub use model::{Invitation, InvitationAction, InvitationStatus};
