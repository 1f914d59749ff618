pub mod model;
pub mod path;

pub use model::{CreateDirectory, Directory, SubtreeCounts};
