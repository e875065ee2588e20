//! Caller authentication and authorization.
//!
//! Requests carry `Authorization: Bearer <token>`. The token is looked up in
//! the configured user table; everything after that is role checks.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::config::Role;

use super::response::ApiErrorResponse;
use super::state::AppState;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// User identifier, for logs.
    pub user_id: String,
    /// The caller's role.
    pub role: Role,
    /// The roster entry the caller is, if any.
    pub worker_id: Option<String>,
}

impl Caller {
    /// Fails with 403 unless the caller has one of `allowed`.
    pub fn require(&self, allowed: &[Role]) -> Result<(), ApiErrorResponse> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiErrorResponse::forbidden(format!(
                "role '{}' may not perform this action",
                self.role
            )))
        }
    }

    /// Resolves which worker a per-worker read is about.
    ///
    /// Administrators get what they asked for (`None` meaning everyone).
    /// Anyone else is pinned to their own worker id whatever they asked for,
    /// and is refused if they have none.
    pub fn worker_scope(&self, requested: Option<String>) -> Result<Option<String>, ApiErrorResponse> {
        if self.role.is_admin() {
            return Ok(requested);
        }
        match &self.worker_id {
            Some(own) => Ok(Some(own.clone())),
            None => Err(ApiErrorResponse::forbidden(
                "caller is not linked to a worker",
            )),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(ApiErrorResponse::unauthorized)?;

        let user = state
            .config()
            .find_user(token)
            .ok_or_else(ApiErrorResponse::unauthorized)?;

        Ok(Caller {
            user_id: user.user_id.clone(),
            role: user.role,
            worker_id: user.worker_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn caller(role: Role, worker_id: Option<&str>) -> Caller {
        Caller {
            user_id: "u-1".to_string(),
            role,
            worker_id: worker_id.map(str::to_string),
        }
    }

    #[test]
    fn test_admin_scope_passes_request_through() {
        let admin = caller(Role::Admin, None);
        assert_eq!(admin.worker_scope(None).unwrap(), None);
        assert_eq!(
            admin.worker_scope(Some("w-002".to_string())).unwrap(),
            Some("w-002".to_string())
        );
    }

    #[test]
    fn test_worker_scope_forced_to_self() {
        let worker = caller(Role::Worker, Some("w-001"));
        assert_eq!(
            worker.worker_scope(Some("w-002".to_string())).unwrap(),
            Some("w-001".to_string())
        );
        assert_eq!(worker.worker_scope(None).unwrap(), Some("w-001".to_string()));
    }

    #[test]
    fn test_unlinked_non_admin_refused() {
        let manager = caller(Role::SiteManager, None);
        let err = manager.worker_scope(None).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_require_role() {
        let manager = caller(Role::SiteManager, None);
        assert!(manager.require(&[Role::Admin, Role::SiteManager]).is_ok());
        assert_eq!(
            manager.require(&[Role::Admin]).unwrap_err().status,
            StatusCode::FORBIDDEN
        );
    }
}
