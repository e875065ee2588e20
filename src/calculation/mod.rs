//! Labor and salary calculation.
//!
//! This module normalizes raw labor values, aggregates them per worker and
//! per site, and turns a worker's monthly labor into pay figures.

mod aggregation;
mod labor_unit;
mod salary;

pub use aggregation::{
    aggregate_by_site, aggregate_by_worker, filter_month, round_man_days, SiteDayLabor,
    SiteLaborSummary, WorkerLaborSummary, MAN_DAY_PRECISION,
};
pub use labor_unit::{
    calculate_worker_count, normalize_labor_unit, HOURS_PER_MAN_DAY, HOURS_THRESHOLD,
    MAX_LABOR_VALUE,
};
pub use salary::{compute_salary, MONEY_PRECISION};
