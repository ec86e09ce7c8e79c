pub mod options;
pub mod types;

pub use options::SyncOptions;
pub use types::{HitPoint, Range};
