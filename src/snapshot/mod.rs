//! Pre-mutation snapshots of the files being committed.

pub mod record;
pub mod store;

pub use record::{BackupRecord, snapshot_key};
pub use store::SnapshotStore;
