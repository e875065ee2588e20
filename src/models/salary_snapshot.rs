//! Salary snapshot models.
//!
//! A [`SalarySnapshot`] is a persisted, point-in-time payroll result for one
//! worker-month. Its [`SnapshotStatus`] only ever moves forward, and once a
//! snapshot is paid it is never recomputed.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollMonth;

/// Lifecycle status of a salary snapshot.
///
/// # Example
///
/// ```
/// use site_payroll::models::SnapshotStatus;
///
/// assert!(SnapshotStatus::Issued.can_advance_to(SnapshotStatus::Approved));
/// assert!(!SnapshotStatus::Paid.can_advance_to(SnapshotStatus::Issued));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// Computed and handed to the worker for review.
    Issued,
    /// Confirmed by an administrator.
    Approved,
    /// Paid out. Terminal.
    Paid,
}

impl SnapshotStatus {
    /// Returns true if `next` is a forward move from this status.
    ///
    /// Paying straight from `Issued` is allowed; nothing leaves `Paid`.
    pub fn can_advance_to(self, next: SnapshotStatus) -> bool {
        matches!(
            (self, next),
            (SnapshotStatus::Issued, SnapshotStatus::Approved)
                | (SnapshotStatus::Issued, SnapshotStatus::Paid)
                | (SnapshotStatus::Approved, SnapshotStatus::Paid)
        )
    }

    /// Returns true once the snapshot can no longer change.
    pub fn is_final(self) -> bool {
        self == SnapshotStatus::Paid
    }

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotStatus::Issued => "issued",
            SnapshotStatus::Approved => "approved",
            SnapshotStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the single snapshot a worker can have for a month.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotKey {
    /// The payroll month.
    pub month: PayrollMonth,
    /// The worker.
    pub worker_id: String,
}

impl SnapshotKey {
    /// Creates a key for a worker-month.
    pub fn new(worker_id: impl Into<String>, month: PayrollMonth) -> Self {
        Self {
            month,
            worker_id: worker_id.into(),
        }
    }
}

/// The pay figures computed for a worker-month, before they are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryComputation {
    /// The worker paid.
    pub worker_id: String,
    /// The month paid for, serialized as `year` and `month`.
    #[serde(flatten)]
    pub period: PayrollMonth,
    /// Total normalized labor for the month.
    pub total_man_days: Decimal,
    /// Distinct dates with at least one entry.
    pub days_worked: u32,
    /// Man-days per site.
    pub site_breakdown: BTreeMap<String, Decimal>,
    /// Pay for one man-day at computation time.
    pub daily_wage: Decimal,
    /// `total_man_days × daily_wage`.
    pub gross_pay: Decimal,
    /// Tax withheld from the gross.
    pub withholding: Decimal,
    /// `gross_pay − withholding`.
    pub net_pay: Decimal,
}

/// A stored payroll result for one worker-month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySnapshot {
    /// Unique identifier for this snapshot.
    pub id: Uuid,
    /// The computed figures.
    #[serde(flatten)]
    pub computation: SalaryComputation,
    /// Lifecycle status.
    pub status: SnapshotStatus,
    /// When the figures were (last) computed.
    pub issued_at: DateTime<Utc>,
    /// When an administrator approved the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// When the snapshot was paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    /// Bumped on every write; used for conditional updates.
    pub version: u64,
}

impl SalarySnapshot {
    /// The key this snapshot is stored under.
    pub fn key(&self) -> SnapshotKey {
        SnapshotKey::new(self.computation.worker_id.clone(), self.computation.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(SnapshotStatus::Issued.can_advance_to(SnapshotStatus::Approved));
        assert!(SnapshotStatus::Issued.can_advance_to(SnapshotStatus::Paid));
        assert!(SnapshotStatus::Approved.can_advance_to(SnapshotStatus::Paid));
    }

    #[test]
    fn test_backward_and_self_transitions_rejected() {
        assert!(!SnapshotStatus::Approved.can_advance_to(SnapshotStatus::Issued));
        assert!(!SnapshotStatus::Paid.can_advance_to(SnapshotStatus::Issued));
        assert!(!SnapshotStatus::Paid.can_advance_to(SnapshotStatus::Approved));
        assert!(!SnapshotStatus::Paid.can_advance_to(SnapshotStatus::Paid));
        assert!(!SnapshotStatus::Issued.can_advance_to(SnapshotStatus::Issued));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&SnapshotStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        let status: SnapshotStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, SnapshotStatus::Paid);
    }

    #[test]
    fn test_only_paid_is_final() {
        assert!(SnapshotStatus::Paid.is_final());
        assert!(!SnapshotStatus::Approved.is_final());
        assert!(!SnapshotStatus::Issued.is_final());
    }
}
