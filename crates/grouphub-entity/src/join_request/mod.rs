pub mod model;

pub use model::{JoinRequest, JoinRequestStatus, JoinRequestView, ReviewAction};
