//! Snapshot persistence for geotrail timelines.
//!
//! A `SnapshotStore` loads and saves one `TimelineDocument` per identity.
//! `FileSnapshotStore` keeps them as checksummed files in a directory,
//! `MemorySnapshotStore` keeps them in a map.

pub mod error;
pub mod document;
pub mod snapshot;
pub mod store;

pub use document::TimelineDocument;
pub use error::{PersistenceError, Result};
pub use snapshot::SnapshotHeader;
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
