pub mod model;

pub use model::FileEntry;
