//! Worker roster model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A worker on the payroll roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Pay for one man-day.
    pub daily_wage: Decimal,
    /// Inactive workers keep their history but accept no new entries.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}
