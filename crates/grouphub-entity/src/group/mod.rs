pub mod model;

pub use model::{CreateGroup, Group, GroupSummary};
