//! Labor aggregation per worker and per site.
//!
//! Entries are normalized to man-days with [`WorkEntry::man_days`] and then
//! summed for a single [`PayrollMonth`]. Output is ordered by id so that
//! responses are stable between calls.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::labor_unit::calculate_worker_count;
use crate::models::{PayrollMonth, WorkEntry};

/// Man-day sums are reported to this many decimal places.
pub const MAN_DAY_PRECISION: i32 = 4;

/// Labor totals for one worker in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerLaborSummary {
    /// The worker.
    pub worker_id: String,
    /// Total man-days across all sites.
    pub total_man_days: f64,
    /// Distinct dates with at least one entry.
    pub days_worked: u32,
    /// Man-days per site.
    pub sites: BTreeMap<String, f64>,
}

/// Labor on one site on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDayLabor {
    /// The day.
    pub date: NaiveDate,
    /// Total man-days booked that day.
    pub man_days: f64,
    /// Head count implied by the man-day total.
    pub worker_count: u32,
}

/// Labor totals for one site in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLaborSummary {
    /// The site.
    pub site_id: String,
    /// Total man-days for the month.
    pub total_man_days: f64,
    /// Distinct workers with entries on the site.
    pub distinct_workers: u32,
    /// Per-day breakdown, oldest first.
    pub days: Vec<SiteDayLabor>,
}

/// Rounds a man-day sum to [`MAN_DAY_PRECISION`] places.
///
/// Floating-point sums such as `0.1 + 0.7` land just off the true value; this
/// keeps them from tipping [`calculate_worker_count`] over a whole number.
pub fn round_man_days(value: f64) -> f64 {
    let scale = 10f64.powi(MAN_DAY_PRECISION);
    (value * scale).round() / scale
}

/// Returns the entries dated within `month`.
pub fn filter_month(entries: &[WorkEntry], month: PayrollMonth) -> Vec<&WorkEntry> {
    entries
        .iter()
        .filter(|entry| month.contains_date(entry.date))
        .collect()
}

/// Sums man-days per worker for a month.
///
/// # Example
///
/// ```
/// use site_payroll::calculation::aggregate_by_worker;
/// use site_payroll::models::{PayrollMonth, WorkEntry};
/// use chrono::NaiveDate;
///
/// let entries = vec![
///     WorkEntry {
///         worker_id: "w-001".to_string(),
///         site_id: "site-a".to_string(),
///         date: NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(),
///         labor: 8.0,
///         note: None,
///     },
///     WorkEntry {
///         worker_id: "w-001".to_string(),
///         site_id: "site-b".to_string(),
///         date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
///         labor: 0.5,
///         note: None,
///     },
/// ];
///
/// let summaries = aggregate_by_worker(&entries, PayrollMonth::new(2026, 1).unwrap());
/// assert_eq!(summaries.len(), 1);
/// assert_eq!(summaries[0].total_man_days, 1.5);
/// assert_eq!(summaries[0].days_worked, 2);
/// ```
pub fn aggregate_by_worker(entries: &[WorkEntry], month: PayrollMonth) -> Vec<WorkerLaborSummary> {
    struct Acc {
        total: f64,
        dates: BTreeSet<NaiveDate>,
        sites: BTreeMap<String, f64>,
    }

    let mut by_worker: BTreeMap<&str, Acc> = BTreeMap::new();

    for entry in filter_month(entries, month) {
        let man_days = entry.man_days();
        let acc = by_worker.entry(&entry.worker_id).or_insert_with(|| Acc {
            total: 0.0,
            dates: BTreeSet::new(),
            sites: BTreeMap::new(),
        });
        acc.total += man_days;
        acc.dates.insert(entry.date);
        *acc.sites.entry(entry.site_id.clone()).or_insert(0.0) += man_days;
    }

    by_worker
        .into_iter()
        .map(|(worker_id, acc)| WorkerLaborSummary {
            worker_id: worker_id.to_string(),
            total_man_days: round_man_days(acc.total),
            days_worked: acc.dates.len() as u32,
            sites: acc
                .sites
                .into_iter()
                .map(|(site, man_days)| (site, round_man_days(man_days)))
                .collect(),
        })
        .collect()
}

/// Sums man-days per site and per day for a month, deriving daily head counts.
pub fn aggregate_by_site(entries: &[WorkEntry], month: PayrollMonth) -> Vec<SiteLaborSummary> {
    struct Acc<'a> {
        workers: BTreeSet<&'a str>,
        days: BTreeMap<NaiveDate, f64>,
    }

    let mut by_site: BTreeMap<&str, Acc<'_>> = BTreeMap::new();

    for entry in filter_month(entries, month) {
        let acc = by_site.entry(&entry.site_id).or_insert_with(|| Acc {
            workers: BTreeSet::new(),
            days: BTreeMap::new(),
        });
        acc.workers.insert(&entry.worker_id);
        *acc.days.entry(entry.date).or_insert(0.0) += entry.man_days();
    }

    by_site
        .into_iter()
        .map(|(site_id, acc)| {
            let days: Vec<SiteDayLabor> = acc
                .days
                .into_iter()
                .map(|(date, man_days)| {
                    let man_days = round_man_days(man_days);
                    SiteDayLabor {
                        date,
                        man_days,
                        worker_count: calculate_worker_count(man_days),
                    }
                })
                .collect();
            let total: f64 = days.iter().map(|d| d.man_days).sum();
            SiteLaborSummary {
                site_id: site_id.to_string(),
                total_man_days: round_man_days(total),
                distinct_workers: acc.workers.len() as u32,
                days,
            }
        })
        .collect()
}
