//! Error types for the site payroll service.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while aggregating labor, managing
//! salary snapshots and serving preview sessions.

use thiserror::Error;

use crate::models::SnapshotStatus;

/// The main error type for the site payroll service.
///
/// All fallible operations in the crate return this error type, and the HTTP
/// layer maps every variant onto a status code in one place.
///
/// # Example
///
/// ```
/// use site_payroll::error::PayrollError;
///
/// let error = PayrollError::ConfigNotFound {
///     path: "/missing/service.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/service.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A work entry was rejected.
    #[error("Invalid work entry for worker '{worker_id}': {message}")]
    InvalidEntry {
        /// The worker the entry was recorded for.
        worker_id: String,
        /// What made the entry invalid.
        message: String,
    },

    /// A year/month pair did not describe a real month.
    #[error("Invalid period {year}-{month}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// The worker is not in the roster.
    #[error("Worker not found: {worker_id}")]
    UnknownWorker {
        /// The worker id that was not found.
        worker_id: String,
    },

    /// No snapshot exists for the worker-month.
    #[error("Salary snapshot not found for worker '{worker_id}' in {year}-{month:02}")]
    SnapshotNotFound {
        /// The worker id.
        worker_id: String,
        /// The snapshot year.
        year: i32,
        /// The snapshot month.
        month: u32,
    },

    /// The snapshot was already paid and can no longer change.
    #[error("Salary snapshot for worker '{worker_id}' in {year}-{month:02} is already paid")]
    SnapshotPaid {
        /// The worker id.
        worker_id: String,
        /// The snapshot year.
        year: i32,
        /// The snapshot month.
        month: u32,
    },

    /// The requested status change does not move the snapshot forward.
    #[error("Cannot transition salary snapshot from {from} to {to}")]
    InvalidTransition {
        /// Status the snapshot currently has.
        from: SnapshotStatus,
        /// Status that was requested.
        to: SnapshotStatus,
    },

    /// A conditional update found the snapshot written since it was read.
    #[error("Salary snapshot changed concurrently: expected version {expected}, found {actual}")]
    StaleSnapshot {
        /// Version the caller based its update on.
        expected: u64,
        /// Version actually stored.
        actual: u64,
    },

    /// Pay figures fell outside the representable decimal range.
    #[error("Cannot compute pay for worker {worker_id}: {message}")]
    PayOutOfRange {
        /// The worker being paid.
        worker_id: String,
        /// Which figure overflowed.
        message: String,
    },

    /// A preview payload was rejected.
    #[error("Invalid preview: {message}")]
    InvalidPreview {
        /// What made the payload invalid.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/service.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/service.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = PayrollError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_snapshot_not_found_pads_month() {
        let error = PayrollError::SnapshotNotFound {
            worker_id: "w-001".to_string(),
            year: 2025,
            month: 3,
        };
        assert_eq!(
            error.to_string(),
            "Salary snapshot not found for worker 'w-001' in 2025-03"
        );
    }

    #[test]
    fn test_invalid_transition_displays_statuses() {
        let error = PayrollError::InvalidTransition {
            from: SnapshotStatus::Paid,
            to: SnapshotStatus::Issued,
        };
        assert_eq!(
            error.to_string(),
            "Cannot transition salary snapshot from paid to issued"
        );
    }

    #[test]
    fn test_stale_snapshot_displays_versions() {
        let error = PayrollError::StaleSnapshot {
            expected: 1,
            actual: 3,
        };
        assert_eq!(
            error.to_string(),
            "Salary snapshot changed concurrently: expected version 1, found 3"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PayrollError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_unknown_worker() -> PayrollResult<()> {
            Err(PayrollError::UnknownWorker {
                worker_id: "ghost".to_string(),
            })
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_unknown_worker()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
