//! Persistence module
//!
//! Scene topology and node placement snapshots using serde and JSON.

pub mod snapshot;

pub use snapshot::{
    load_from_file, save_to_file, EdgeRecord, GraphSnapshot, NodeRecord, PinGraphSnapshot, Position,
    SnapshotError, Versioned, SNAPSHOT_VERSION,
};
