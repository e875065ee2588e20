//! Request types for the site payroll API.
//!
//! Bodies and query strings use camelCase field names.

use serde::{Deserialize, Serialize};

use crate::models::{PayrollMonth, PreviewData, SnapshotStatus, WorkEntry};
use crate::store::SnapshotFilter;

use super::response::ApiErrorResponse;

/// Body of `POST /preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreviewRequest {
    /// The grid to preview.
    #[serde(flatten)]
    pub data: PreviewData,
    /// Requested lifetime; the configured default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
}

/// Body of `POST /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAttendanceRequest {
    /// Entries to record, all or nothing.
    pub entries: Vec<WorkEntry>,
}

/// Query of `GET /labor/workers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerLaborQuery {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
    /// Worker to report on; only honoured for administrators.
    #[serde(default)]
    pub worker_id: Option<String>,
}

/// Query of `GET /labor/sites`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLaborQuery {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
    /// Restrict to one site.
    #[serde(default)]
    pub site_id: Option<String>,
}

/// Query of `GET /salary/snapshots`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotListQuery {
    /// Only this year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Only this month.
    #[serde(default)]
    pub month: Option<u32>,
    /// Only this worker; only honoured for administrators.
    #[serde(default)]
    pub worker_id: Option<String>,
    /// Only this status.
    #[serde(default)]
    pub status: Option<SnapshotStatus>,
}

impl SnapshotListQuery {
    /// Builds a store filter for the given (already scoped) worker id.
    pub fn into_filter(self, worker_id: Option<String>) -> Result<SnapshotFilter, ApiErrorResponse> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(ApiErrorResponse::validation(format!(
                    "month must be between 1 and 12, got {}",
                    month
                )));
            }
        }
        Ok(SnapshotFilter {
            worker_id,
            year: self.year,
            month: self.month,
            status: self.status,
        })
    }
}

/// Body of the snapshot issue, approve and pay endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRequest {
    /// The worker.
    pub worker_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
}

impl SnapshotRequest {
    /// The validated month of the request.
    pub fn period(&self) -> crate::error::PayrollResult<PayrollMonth> {
        PayrollMonth::new(self.year, self.month)
    }
}
