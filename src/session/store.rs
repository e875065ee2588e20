//! TTL-bound preview session store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::models::PreviewData;

/// A stored preview and the instant it stops being served.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSession {
    /// The preview payload.
    pub data: PreviewData,
    /// Absolute expiry; the session is gone at and after this instant.
    pub expires_at: DateTime<Utc>,
}

impl PreviewSession {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Process-local map from session id to preview.
///
/// There is no background sweeper. Expired sessions are dropped when they
/// are read and whenever a new session is created, so an idle process can
/// hold expired sessions in memory until traffic resumes. Sessions are lost
/// on restart and are not visible to other instances.
///
/// # Example
///
/// ```
/// use site_payroll::models::PreviewData;
/// use site_payroll::session::PreviewSessionStore;
/// use std::time::Duration;
///
/// let store = PreviewSessionStore::new(Duration::from_secs(600), Duration::from_secs(3600));
/// let data = PreviewData { rows: 2, cols: 3, items: vec![] };
///
/// let id = store.create(data.clone(), None);
/// assert_eq!(store.get(&id), Some(data));
/// assert_eq!(store.get("unknown"), None);
/// ```
#[derive(Debug)]
pub struct PreviewSessionStore {
    sessions: Mutex<HashMap<String, PreviewSession>>,
    default_ttl: Duration,
    max_ttl: Duration,
}

impl PreviewSessionStore {
    /// Creates an empty store.
    ///
    /// `default_ttl` applies when [`create`](Self::create) is given no TTL;
    /// requested TTLs are clamped to `max_ttl`.
    pub fn new(default_ttl: Duration, max_ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            default_ttl,
            max_ttl: max_ttl.max(default_ttl),
        }
    }

    /// Stores a preview and returns its id.
    pub fn create(&self, data: PreviewData, ttl: Option<Duration>) -> String {
        self.create_at(data, ttl, Utc::now())
    }

    /// Same as [`create`](Self::create) with an explicit clock.
    pub fn create_at(&self, data: PreviewData, ttl: Option<Duration>, now: DateTime<Utc>) -> String {
        let ttl = ttl.unwrap_or(self.default_ttl).min(self.max_ttl);
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52));
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let id = Uuid::new_v4().to_string();

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        let swept = before - sessions.len();
        if swept > 0 {
            debug!(swept, "Expired preview sessions removed");
        }

        sessions.insert(id.clone(), PreviewSession { data, expires_at });
        debug!(session_id = %id, %expires_at, live = sessions.len(), "Preview session created");
        id
    }

    /// Returns the preview for `id`, or `None` if it is unknown or expired.
    pub fn get(&self, id: &str) -> Option<PreviewData> {
        self.get_at(id, Utc::now())
    }

    /// Same as [`get`](Self::get) with an explicit clock.
    pub fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<PreviewData> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(id) {
            Some(session) if session.is_expired(now) => {
                sessions.remove(id);
                debug!(session_id = %id, "Preview session expired");
                None
            }
            Some(session) => Some(session.data.clone()),
            None => None,
        }
    }

    /// Number of sessions held, expired or not.
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store() -> PreviewSessionStore {
        PreviewSessionStore::new(Duration::from_secs(600), Duration::from_secs(3600))
    }

    fn data(rows: u32) -> PreviewData {
        PreviewData {
            rows,
            cols: 4,
            items: vec![serde_json::json!({"row": 0, "col": 1, "photoId": "p-1"})],
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 13, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_create_then_get_returns_same_data() {
        let store = store();
        let id = store.create_at(data(3), None, t0());
        assert_eq!(store.get_at(&id, t0()), Some(data(3)));
    }

    #[test]
    fn test_unknown_id_returns_none() {
        let store = store();
        store.create_at(data(3), None, t0());
        assert_eq!(store.get_at("missing", t0()), None);
    }

    #[test]
    fn test_default_ttl_is_applied() {
        let store = store();
        let id = store.create_at(data(3), None, t0());
        let just_before = t0() + chrono::Duration::seconds(599);
        let at_expiry = t0() + chrono::Duration::seconds(600);
        assert!(store.get_at(&id, just_before).is_some());
        assert_eq!(store.get_at(&id, at_expiry), None);
    }

    #[test]
    fn test_expired_session_is_removed_on_read() {
        let store = store();
        let id = store.create_at(data(3), Some(Duration::from_secs(5)), t0());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_at(&id, t0() + chrono::Duration::seconds(6)), None);
        assert!(store.is_empty());
        // Still gone even if the clock were to go backwards.
        assert_eq!(store.get_at(&id, t0()), None);
    }

    #[test]
    fn test_create_sweeps_expired_sessions() {
        let store = store();
        store.create_at(data(1), Some(Duration::from_secs(5)), t0());
        store.create_at(data(2), Some(Duration::from_secs(5)), t0());
        let keep = store.create_at(data(3), Some(Duration::from_secs(60)), t0());
        assert_eq!(store.len(), 3);

        let later = t0() + chrono::Duration::seconds(10);
        let fresh = store.create_at(data(4), None, later);
        assert_eq!(store.len(), 2);
        assert!(store.get_at(&keep, later).is_some());
        assert!(store.get_at(&fresh, later).is_some());
    }

    #[test]
    fn test_expired_sessions_linger_without_traffic() {
        let store = store();
        store.create_at(data(1), Some(Duration::from_secs(1)), t0());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_requested_ttl_clamped_to_max() {
        let store = PreviewSessionStore::new(Duration::from_secs(60), Duration::from_secs(120));
        let id = store.create_at(data(1), Some(Duration::from_secs(86_400)), t0());
        assert!(store.get_at(&id, t0() + chrono::Duration::seconds(119)).is_some());
        assert_eq!(store.get_at(&id, t0() + chrono::Duration::seconds(120)), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let store = store();
        let a = store.create_at(data(1), None, t0());
        let b = store.create_at(data(1), None, t0());
        assert_ne!(a, b);
    }
}
