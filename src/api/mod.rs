//! HTTP API module for the site payroll service.
//!
//! This module provides the REST endpoints for previews, attendance, labor
//! summaries and salary snapshots.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use auth::Caller;
pub use handlers::create_router;
pub use request::{
    CreatePreviewRequest, RecordAttendanceRequest, SiteLaborQuery, SnapshotListQuery,
    SnapshotRequest, WorkerLaborQuery,
};
pub use response::{ApiError, ApiErrorResponse, ApiResponse, PreviewCreated};
pub use state::AppState;
