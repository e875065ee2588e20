//! Work entry ledger.

use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::calculation::MAX_LABOR_VALUE;
use crate::config::ConfigLoader;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayrollMonth, WorkEntry};

/// Append-only record of work entries.
#[derive(Debug, Default)]
pub struct AttendanceLedger {
    entries: RwLock<Vec<WorkEntry>>,
}

impl AttendanceLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a batch of entries.
    ///
    /// The batch is all-or-nothing: the first invalid entry rejects the whole
    /// batch and nothing is stored. An entry is invalid when its labor is
    /// negative, not finite or above [`MAX_LABOR_VALUE`], when its site id is
    /// blank, or when its worker is unknown or inactive.
    ///
    /// Returns the number of entries stored.
    pub fn record(&self, batch: Vec<WorkEntry>, config: &ConfigLoader) -> PayrollResult<usize> {
        for entry in &batch {
            Self::validate(entry, config)?;
        }

        let count = batch.len();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.extend(batch);
        debug!(recorded = count, total = entries.len(), "Work entries recorded");
        Ok(count)
    }

    fn validate(entry: &WorkEntry, config: &ConfigLoader) -> PayrollResult<()> {
        let invalid = |message: String| PayrollError::InvalidEntry {
            worker_id: entry.worker_id.clone(),
            message,
        };

        if !entry.labor.is_finite() || entry.labor < 0.0 {
            return Err(invalid(format!(
                "labor must be a non-negative number, got {}",
                entry.labor
            )));
        }
        if entry.labor > MAX_LABOR_VALUE {
            return Err(invalid(format!(
                "labor must be at most {MAX_LABOR_VALUE} hours, got {}",
                entry.labor
            )));
        }
        if entry.site_id.trim().is_empty() {
            return Err(invalid("site id is empty".to_string()));
        }

        let worker = config.get_worker(&entry.worker_id)?;
        if !worker.active {
            return Err(invalid("worker is inactive".to_string()));
        }
        Ok(())
    }

    /// Returns the entries in `month`, optionally narrowed to one worker
    /// and/or one site.
    pub fn entries_in(
        &self,
        month: PayrollMonth,
        worker_id: Option<&str>,
        site_id: Option<&str>,
    ) -> Vec<WorkEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .filter(|e| month.contains_date(e.date))
            .filter(|e| worker_id.is_none_or(|id| e.worker_id == id))
            .filter(|e| site_id.is_none_or(|id| e.site_id == id))
            .cloned()
            .collect()
    }

    /// Total number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
