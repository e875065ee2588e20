//! Site payroll service for construction-site management.
//!
//! This crate normalizes daily labor reports into man-days, aggregates them
//! per worker and per site, manages monthly salary snapshots through their
//! issued, approved and paid states, and holds short-lived document previews.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;
