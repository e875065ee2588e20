//! Labor-unit normalization.
//!
//! Site reports record labor either as an hour total or as man-days, with no
//! field saying which. This module turns any raw value into man-days and
//! derives head counts from man-day totals.

/// Raw values at or above this are read as hour totals.
///
/// The boundary is a heuristic tied to how upstream reports are filled in:
/// nobody books two or more man-days for one worker on one day, and nobody
/// books less than two hours. Keep it exactly at `2.0`.
pub const HOURS_THRESHOLD: f64 = 2.0;

/// Length of one standard shift in hours.
pub const HOURS_PER_MAN_DAY: f64 = 8.0;

/// Largest raw labor value accepted for one entry: a full day in hours.
pub const MAX_LABOR_VALUE: f64 = 24.0;

/// Converts a raw labor value of ambiguous unit into man-days.
///
/// # Rules
///
/// - `v >= 2.0`: an hour total, returns `v / 8`
/// - `0 < v < 2.0`: already man-days, returned as is
/// - `v <= 0`, `NaN` or infinite: returns `0`
///
/// The result is always finite and non-negative.
///
/// # Examples
///
/// ```
/// use site_payroll::calculation::normalize_labor_unit;
///
/// assert_eq!(normalize_labor_unit(8.0), 1.0);
/// assert_eq!(normalize_labor_unit(2.0), 0.25);
/// assert_eq!(normalize_labor_unit(1.5), 1.5);
/// assert_eq!(normalize_labor_unit(-3.0), 0.0);
/// assert_eq!(normalize_labor_unit(f64::NAN), 0.0);
/// ```
pub fn normalize_labor_unit(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    if value >= HOURS_THRESHOLD {
        value / HOURS_PER_MAN_DAY
    } else {
        value
    }
}

/// Derives the number of workers needed to cover a man-day total.
///
/// Partial man-days still take a whole person, so the total is rounded up.
/// Non-positive and non-finite totals give `0`.
///
/// # Examples
///
/// ```
/// use site_payroll::calculation::calculate_worker_count;
///
/// assert_eq!(calculate_worker_count(0.0), 0);
/// assert_eq!(calculate_worker_count(1.2), 2);
/// assert_eq!(calculate_worker_count(3.0), 3);
/// assert_eq!(calculate_worker_count(-5.0), 0);
/// ```
pub fn calculate_worker_count(man_days: f64) -> u32 {
    if !man_days.is_finite() || man_days <= 0.0 {
        return 0;
    }
    let count = man_days.ceil();
    if count >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        count as u32
    }
}
