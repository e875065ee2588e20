//! Core data models for the site payroll service.
//!
//! This module contains all the domain models used throughout the crate.

mod period;
mod preview;
mod salary_snapshot;
mod work_entry;
mod worker;

pub use period::PayrollMonth;
pub use preview::PreviewData;
pub use salary_snapshot::{SalaryComputation, SalarySnapshot, SnapshotKey, SnapshotStatus};
pub use work_entry::WorkEntry;
pub use worker::Worker;
