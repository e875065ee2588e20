//! In-process stores for work entries and salary snapshots.
//!
//! Both stores are built once at startup, shared through
//! [`AppState`](crate::api::AppState) and guard their contents with a
//! `RwLock`. Locks are never held across an `.await`.

mod attendance;
mod snapshots;

pub use attendance::AttendanceLedger;
pub use snapshots::{SnapshotFilter, SnapshotStore};
