//! Salary snapshot store.
//!
//! One snapshot per worker-month. Status changes go through
//! [`SnapshotStore::transition`], a conditional update that only applies when
//! the stored version still matches what the caller last saw.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{SalaryComputation, SalarySnapshot, SnapshotKey, SnapshotStatus};

/// Criteria for [`SnapshotStore::list`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFilter {
    /// Only this worker.
    pub worker_id: Option<String>,
    /// Only this year.
    pub year: Option<i32>,
    /// Only this month.
    pub month: Option<u32>,
    /// Only this status.
    pub status: Option<SnapshotStatus>,
}

impl SnapshotFilter {
    fn matches(&self, snapshot: &SalarySnapshot) -> bool {
        let c = &snapshot.computation;
        self.worker_id.as_deref().is_none_or(|id| c.worker_id == id)
            && self.year.is_none_or(|y| c.period.year() == y)
            && self.month.is_none_or(|m| c.period.month() == m)
            && self.status.is_none_or(|s| snapshot.status == s)
    }
}

/// Holds every salary snapshot in memory.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: RwLock<BTreeMap<SnapshotKey, SalarySnapshot>>,
}

fn not_found(key: &SnapshotKey) -> PayrollError {
    PayrollError::SnapshotNotFound {
        worker_id: key.worker_id.clone(),
        year: key.month.year(),
        month: key.month.month(),
    }
}

impl SnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores freshly computed figures as an `issued` snapshot.
    pub fn issue(&self, computation: SalaryComputation) -> PayrollResult<SalarySnapshot> {
        self.issue_at(computation, Utc::now())
    }

    /// Same as [`SnapshotStore::issue`] with an explicit clock.
    ///
    /// An existing `issued` or `approved` snapshot is replaced and goes back to
    /// `issued`, keeping its id. A `paid` snapshot is never recomputed.
    pub fn issue_at(
        &self,
        computation: SalaryComputation,
        now: DateTime<Utc>,
    ) -> PayrollResult<SalarySnapshot> {
        let key = SnapshotKey::new(computation.worker_id.clone(), computation.period);
        let mut snapshots = self.snapshots.write().unwrap_or_else(PoisonError::into_inner);

        let snapshot = match snapshots.get(&key) {
            Some(existing) if existing.status.is_final() => {
                return Err(PayrollError::SnapshotPaid {
                    worker_id: key.worker_id.clone(),
                    year: key.month.year(),
                    month: key.month.month(),
                });
            }
            Some(existing) => SalarySnapshot {
                id: existing.id,
                computation,
                status: SnapshotStatus::Issued,
                issued_at: now,
                approved_at: None,
                paid_at: None,
                version: existing.version + 1,
            },
            None => SalarySnapshot {
                id: Uuid::new_v4(),
                computation,
                status: SnapshotStatus::Issued,
                issued_at: now,
                approved_at: None,
                paid_at: None,
                version: 1,
            },
        };

        info!(
            worker_id = %key.worker_id,
            period = %key.month,
            version = snapshot.version,
            gross_pay = %snapshot.computation.gross_pay,
            "Salary snapshot issued"
        );
        snapshots.insert(snapshot.key(), snapshot.clone());
        Ok(snapshot)
    }

    /// Gets the snapshot for a worker-month.
    pub fn get(&self, key: &SnapshotKey) -> PayrollResult<SalarySnapshot> {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| not_found(key))
    }

    /// Lists snapshots matching `filter`, ordered by month then worker id.
    pub fn list(&self, filter: &SnapshotFilter) -> Vec<SalarySnapshot> {
        self.snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect()
    }

    /// Moves the snapshot at `expected_version` to `next`.
    pub fn transition(
        &self,
        key: &SnapshotKey,
        expected_version: u64,
        next: SnapshotStatus,
    ) -> PayrollResult<SalarySnapshot> {
        self.transition_at(key, expected_version, next, Utc::now())
    }

    /// Same as [`SnapshotStore::transition`] with an explicit clock.
    ///
    /// Fails with `StaleSnapshot` if the snapshot was written since the
    /// caller read `expected_version` (a status change or a re-issue), and
    /// with `InvalidTransition` if `next` does not move the snapshot forward.
    pub fn transition_at(
        &self,
        key: &SnapshotKey,
        expected_version: u64,
        next: SnapshotStatus,
        now: DateTime<Utc>,
    ) -> PayrollResult<SalarySnapshot> {
        let mut snapshots = self.snapshots.write().unwrap_or_else(PoisonError::into_inner);
        let snapshot = snapshots.get_mut(key).ok_or_else(|| not_found(key))?;

        if snapshot.version != expected_version {
            return Err(PayrollError::StaleSnapshot {
                expected: expected_version,
                actual: snapshot.version,
            });
        }
        if !snapshot.status.can_advance_to(next) {
            return Err(PayrollError::InvalidTransition {
                from: snapshot.status,
                to: next,
            });
        }

        let from = snapshot.status;
        snapshot.status = next;
        snapshot.version += 1;
        match next {
            SnapshotStatus::Approved => snapshot.approved_at = Some(now),
            SnapshotStatus::Paid => snapshot.paid_at = Some(now),
            SnapshotStatus::Issued => {}
        }

        debug!(
            worker_id = %key.worker_id,
            period = %key.month,
            from = %from,
            to = %next,
            version = snapshot.version,
            "Salary snapshot transitioned"
        );
        Ok(snapshot.clone())
    }

    /// Approves an issued snapshot.
    pub fn approve(&self, key: &SnapshotKey) -> PayrollResult<SalarySnapshot> {
        let current = self.get(key)?;
        if current.status != SnapshotStatus::Issued {
            return Err(PayrollError::InvalidTransition {
                from: current.status,
                to: SnapshotStatus::Approved,
            });
        }
        self.transition(key, current.version, SnapshotStatus::Approved)
    }

    /// Marks a snapshot paid.
    ///
    /// Paying an already-paid snapshot returns it unchanged. When another
    /// caller writes the snapshot between the read and the update, it is
    /// re-read and the pay retried, so the figures paid are always the ones
    /// returned.
    pub fn pay(&self, key: &SnapshotKey) -> PayrollResult<SalarySnapshot> {
        loop {
            let current = self.get(key)?;
            if current.status.is_final() {
                debug!(worker_id = %key.worker_id, period = %key.month, "Snapshot already paid");
                return Ok(current);
            }
            match self.transition(key, current.version, SnapshotStatus::Paid) {
                Err(PayrollError::StaleSnapshot { .. }) => continue,
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayrollMonth;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use std::str::FromStr;
    use std::sync::Arc;

    fn computation(worker: &str, year: i32, month: u32, gross: &str) -> SalaryComputation {
        let gross = Decimal::from_str(gross).unwrap();
        SalaryComputation {
            worker_id: worker.to_string(),
            period: PayrollMonth::new(year, month).unwrap(),
            total_man_days: Decimal::ONE,
            days_worked: 1,
            site_breakdown: BTreeMap::new(),
            daily_wage: gross,
            gross_pay: gross,
            withholding: Decimal::ZERO,
            net_pay: gross,
        }
    }

    fn key(worker: &str, year: i32, month: u32) -> SnapshotKey {
        SnapshotKey::new(worker, PayrollMonth::new(year, month).unwrap())
    }

    #[test]
    fn test_issue_creates_issued_snapshot() {
        let store = SnapshotStore::new();
        let snapshot = store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        assert_eq!(snapshot.status, SnapshotStatus::Issued);
        assert_eq!(snapshot.version, 1);
        assert_eq!(store.get(&key("w-001", 2026, 1)).unwrap(), snapshot);
    }

    #[test]
    fn test_reissue_replaces_and_resets_to_issued() {
        let store = SnapshotStore::new();
        let first = store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        store.approve(&key("w-001", 2026, 1)).unwrap();

        let second = store.issue(computation("w-001", 2026, 1, "30000")).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.status, SnapshotStatus::Issued);
        assert_eq!(second.computation.gross_pay, Decimal::from_str("30000").unwrap());
        assert!(second.approved_at.is_none());
        assert_eq!(second.version, 3);
    }

    #[test]
    fn test_paid_snapshot_is_never_recomputed() {
        let store = SnapshotStore::new();
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        store.pay(&key("w-001", 2026, 1)).unwrap();

        let result = store.issue(computation("w-001", 2026, 1, "99999"));
        assert!(matches!(result, Err(PayrollError::SnapshotPaid { .. })));

        let stored = store.get(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(stored.status, SnapshotStatus::Paid);
        assert_eq!(stored.computation.gross_pay, Decimal::from_str("15000").unwrap());
    }

    #[test]
    fn test_approve_then_pay() {
        let store = SnapshotStore::new();
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();

        let approved = store.approve(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(approved.status, SnapshotStatus::Approved);
        assert!(approved.approved_at.is_some());

        let paid = store.pay(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(paid.status, SnapshotStatus::Paid);
        assert!(paid.paid_at.is_some());
    }

    #[test]
    fn test_pay_directly_from_issued() {
        let store = SnapshotStore::new();
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        let paid = store.pay(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(paid.status, SnapshotStatus::Paid);
    }

    #[test]
    fn test_pay_is_idempotent() {
        let store = SnapshotStore::new();
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        let first = store.pay(&key("w-001", 2026, 1)).unwrap();
        let second = store.pay(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.status, SnapshotStatus::Paid);
    }

    #[test]
    fn test_approve_paid_snapshot_rejected() {
        let store = SnapshotStore::new();
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        store.pay(&key("w-001", 2026, 1)).unwrap();

        let result = store.approve(&key("w-001", 2026, 1));
        assert!(matches!(
            result,
            Err(PayrollError::InvalidTransition {
                from: SnapshotStatus::Paid,
                to: SnapshotStatus::Approved
            })
        ));
    }

    #[test]
    fn test_transition_with_stale_version() {
        let store = SnapshotStore::new();
        let issued = store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        store.approve(&key("w-001", 2026, 1)).unwrap();

        let result = store.transition(&key("w-001", 2026, 1), issued.version, SnapshotStatus::Paid);
        assert!(matches!(
            result,
            Err(PayrollError::StaleSnapshot {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_reissue_after_read_invalidates_transition() {
        let store = SnapshotStore::new();
        let seen = store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        store.issue(computation("w-001", 2026, 1, "30000")).unwrap();

        let result = store.transition(&key("w-001", 2026, 1), seen.version, SnapshotStatus::Paid);
        assert!(matches!(result, Err(PayrollError::StaleSnapshot { .. })));

        let stored = store.get(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(stored.status, SnapshotStatus::Issued);
        assert_eq!(stored.computation.gross_pay, Decimal::from_str("30000").unwrap());

        let paid = store.pay(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(paid.computation.gross_pay, Decimal::from_str("30000").unwrap());
    }

    #[test]
    fn test_transition_backwards_rejected() {
        let store = SnapshotStore::new();
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        let paid = store.pay(&key("w-001", 2026, 1)).unwrap();

        let result = store.transition(&key("w-001", 2026, 1), paid.version, SnapshotStatus::Issued);
        assert!(matches!(result, Err(PayrollError::InvalidTransition { .. })));
    }

    #[test]
    fn test_pay_missing_snapshot() {
        let store = SnapshotStore::new();
        let result = store.pay(&key("w-001", 2026, 1));
        assert!(matches!(result, Err(PayrollError::SnapshotNotFound { .. })));
    }

    #[test]
    fn test_list_filters_and_orders() {
        let store = SnapshotStore::new();
        store.issue(computation("w-002", 2026, 1, "18000")).unwrap();
        store.issue(computation("w-001", 2026, 2, "15000")).unwrap();
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();
        store.pay(&key("w-001", 2026, 1)).unwrap();

        let all = store.list(&SnapshotFilter::default());
        let order: Vec<(u32, &str)> = all
            .iter()
            .map(|s| (s.computation.period.month(), s.computation.worker_id.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "w-001"), (1, "w-002"), (2, "w-001")]);

        let w001 = store.list(&SnapshotFilter {
            worker_id: Some("w-001".to_string()),
            ..Default::default()
        });
        assert_eq!(w001.len(), 2);

        let paid = store.list(&SnapshotFilter {
            status: Some(SnapshotStatus::Paid),
            ..Default::default()
        });
        assert_eq!(paid.len(), 1);

        let feb = store.list(&SnapshotFilter {
            year: Some(2026),
            month: Some(2),
            ..Default::default()
        });
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].computation.worker_id, "w-001");
    }

    #[test]
    fn test_concurrent_pay_settles_once() {
        let store = Arc::new(SnapshotStore::new());
        store.issue(computation("w-001", 2026, 1, "15000")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.pay(&key("w-001", 2026, 1)))
            })
            .collect();

        for handle in handles {
            let snapshot = handle.join().unwrap().unwrap();
            assert_eq!(snapshot.status, SnapshotStatus::Paid);
        }

        // issued (1) + one transition to paid (2)
        let stored = store.get(&key("w-001", 2026, 1)).unwrap();
        assert_eq!(stored.version, 2);
    }
}
