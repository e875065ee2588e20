//! Attendance/work entry model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Labor contributed by a worker on a date at a site.
///
/// `labor` is recorded in an ambiguous unit: some sources send hour totals,
/// others send man-days. It is only interpreted through
/// [`normalize_labor_unit`](crate::calculation::normalize_labor_unit).
///
/// # Example
///
/// ```
/// use site_payroll::models::WorkEntry;
/// use chrono::NaiveDate;
///
/// let entry = WorkEntry {
///     worker_id: "w-001".to_string(),
///     site_id: "site-a".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
///     labor: 8.0,
///     note: None,
/// };
/// assert_eq!(entry.man_days(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    /// The worker who did the work.
    pub worker_id: String,
    /// The site the work was done at.
    pub site_id: String,
    /// The day the work was done.
    pub date: NaiveDate,
    /// Raw labor value, hours or man-days.
    pub labor: f64,
    /// Free-form remark from the site report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl WorkEntry {
    /// The entry's labor in man-days.
    pub fn man_days(&self) -> f64 {
        crate::calculation::normalize_labor_unit(self.labor)
    }
}
