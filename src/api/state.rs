//! Application state for the site payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::session::PreviewSessionStore;
use crate::store::{AttendanceLedger, SnapshotStore};

/// Shared application state.
///
/// Built once at startup. Every store lives for the whole process; there is
/// no teardown beyond process exit.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    attendance: Arc<AttendanceLedger>,
    snapshots: Arc<SnapshotStore>,
    previews: Arc<PreviewSessionStore>,
}

impl AppState {
    /// Creates a new application state with empty stores.
    pub fn new(config: ConfigLoader) -> Self {
        let preview = &config.service().preview;
        let previews = PreviewSessionStore::new(preview.default_ttl(), preview.max_ttl());
        Self {
            config: Arc::new(config),
            attendance: Arc::new(AttendanceLedger::new()),
            snapshots: Arc::new(SnapshotStore::new()),
            previews: Arc::new(previews),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the work entry ledger.
    pub fn attendance(&self) -> &AttendanceLedger {
        &self.attendance
    }

    /// Returns the salary snapshot store.
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Returns the preview session store.
    pub fn previews(&self) -> &PreviewSessionStore {
        &self.previews
    }
}
