//! Payroll month model.
//!
//! This module contains the [`PayrollMonth`] type, the calendar month that
//! labor is aggregated over and that salary snapshots are keyed by.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// A validated calendar month.
///
/// # Example
///
/// ```
/// use site_payroll::models::PayrollMonth;
/// use chrono::NaiveDate;
///
/// let month = PayrollMonth::new(2026, 2).unwrap();
///
/// assert!(month.contains_date(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
/// assert!(!month.contains_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
/// assert_eq!(month.to_string(), "2026-02");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayrollMonth {
    year: i32,
    month: u32,
}

impl PayrollMonth {
    /// Creates a payroll month, rejecting months outside `1..=12` and years
    /// chrono cannot represent.
    pub fn new(year: i32, month: u32) -> PayrollResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(PayrollError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Checks if a given date falls within this month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for PayrollMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_month_zero() {
        let result = PayrollMonth::new(2026, 0);
        assert!(matches!(
            result,
            Err(PayrollError::InvalidPeriod { year: 2026, month: 0 })
        ));
    }

    #[test]
    fn test_new_rejects_month_thirteen() {
        assert!(PayrollMonth::new(2026, 13).is_err());
    }

    #[test]
    fn test_contains_date_on_boundaries() {
        let month = PayrollMonth::new(2026, 1).unwrap();
        assert!(month.contains_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(month.contains_date(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!month.contains_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!month.contains_date(NaiveDate::from_ymd_opt(2027, 1, 15).unwrap()));
    }

    #[test]
    fn test_display_pads_month() {
        let month = PayrollMonth::new(2026, 4).unwrap();
        assert_eq!(month.to_string(), "2026-04");
    }
}
