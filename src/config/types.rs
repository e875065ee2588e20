//! Configuration types for the site payroll service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Worker;

/// Default preview lifetime, ten minutes.
pub const DEFAULT_PREVIEW_TTL_SECS: u64 = 600;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the server listens on (e.g., "127.0.0.1:8080").
    pub bind: String,
}

/// Preview session settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewSettings {
    /// Lifetime used when the client does not ask for one.
    #[serde(default = "default_preview_ttl")]
    pub default_ttl_secs: u64,
    /// Upper bound on client-requested lifetimes.
    #[serde(default = "default_preview_ttl")]
    pub max_ttl_secs: u64,
}

fn default_preview_ttl() -> u64 {
    DEFAULT_PREVIEW_TTL_SECS
}

impl PreviewSettings {
    /// The default lifetime as a [`Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// The maximum lifetime as a [`Duration`].
    pub fn max_ttl(&self) -> Duration {
        Duration::from_secs(self.max_ttl_secs)
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_PREVIEW_TTL_SECS,
            max_ttl_secs: DEFAULT_PREVIEW_TTL_SECS,
        }
    }
}

/// Payroll rules applied when computing snapshots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayrollPolicy {
    /// Fraction of gross pay withheld, in `[0, 1)`.
    pub withholding_rate: Decimal,
}

/// Contents of `service.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Preview session settings.
    #[serde(default)]
    pub preview: PreviewSettings,
    /// Payroll rules.
    pub payroll: PayrollPolicy,
}

/// Contents of `workers.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkersConfig {
    /// The worker roster.
    pub workers: Vec<Worker>,
}

/// What an authenticated caller may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including payroll.
    Admin,
    /// Records attendance and reads site totals.
    SiteManager,
    /// Reads their own labor and salary only.
    Worker,
}

impl Role {
    /// Returns true for administrators.
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::SiteManager => "site_manager",
            Role::Worker => "worker",
        };
        f.write_str(name)
    }
}

/// An API user, identified by a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    /// The bearer token the user authenticates with.
    pub token: String,
    /// Stable user identifier used in logs.
    pub user_id: String,
    /// The user's role.
    pub role: Role,
    /// The roster entry this user is, if any. Required for workers.
    #[serde(default)]
    pub worker_id: Option<String>,
}

/// Contents of `users.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    /// Users allowed to call the API.
    pub users: Vec<ApiUser>,
}

/// The complete service configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct AppConfig {
    service: ServiceConfig,
    workers: HashMap<String, Worker>,
    users: HashMap<String, ApiUser>,
}

impl AppConfig {
    /// Creates a new AppConfig from its component parts.
    ///
    /// Later duplicates replace earlier ones; [`ConfigLoader`](super::ConfigLoader)
    /// rejects duplicates before getting here.
    pub fn new(service: ServiceConfig, workers: Vec<Worker>, users: Vec<ApiUser>) -> Self {
        Self {
            service,
            workers: workers.into_iter().map(|w| (w.id.clone(), w)).collect(),
            users: users.into_iter().map(|u| (u.token.clone(), u)).collect(),
        }
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    /// Returns the worker roster keyed by id.
    pub fn workers(&self) -> &HashMap<String, Worker> {
        &self.workers
    }

    /// Returns the API users keyed by token.
    pub fn users(&self) -> &HashMap<String, ApiUser> {
        &self.users
    }
}
