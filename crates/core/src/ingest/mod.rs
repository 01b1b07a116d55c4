pub mod provider;
pub mod types;

pub use provider::{FileSnapshotProvider, HttpJsonSnapshotProvider, SnapshotProvider};
pub use types::{LoadedSnapshot, SnapshotItem, SnapshotResponse};
