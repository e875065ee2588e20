//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading service
//! configuration from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::Worker;

use super::types::{ApiUser, AppConfig, Role, ServiceConfig, UsersConfig, WorkersConfig};

/// Loads and provides access to service configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates them as a whole and answers roster and user lookups.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── service.yaml   # Server, preview and payroll settings
/// ├── workers.yaml   # Worker roster with daily wages
/// └── users.yaml     # API tokens and roles
/// ```
///
/// # Example
///
/// ```no_run
/// use site_payroll::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
///
/// let worker = loader.get_worker("w-001").unwrap();
/// println!("{} earns {} per man-day", worker.name, worker.daily_wage);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The files are inconsistent (see [`ConfigLoader::from_parts`])
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let service = Self::load_yaml::<ServiceConfig>(&path.join("service.yaml"))?;
        let workers = Self::load_yaml::<WorkersConfig>(&path.join("workers.yaml"))?;
        let users = Self::load_yaml::<UsersConfig>(&path.join("users.yaml"))?;

        Self::from_parts(service, workers.workers, users.users)
    }

    /// Builds a loader from already-parsed parts, applying the same
    /// validation as [`ConfigLoader::load`].
    ///
    /// Rejects:
    /// - a zero default preview lifetime, or a default above the maximum
    /// - a withholding rate outside `[0, 1)`
    /// - duplicate worker ids or tokens
    /// - worker-role users without a roster entry
    pub fn from_parts(
        service: ServiceConfig,
        workers: Vec<Worker>,
        users: Vec<ApiUser>,
    ) -> PayrollResult<Self> {
        Self::validate_service(&service)?;
        Self::validate_workers(&workers)?;
        Self::validate_users(&users, &workers)?;

        Ok(Self {
            config: AppConfig::new(service, workers, users),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn invalid(file: &str, message: impl Into<String>) -> PayrollError {
        PayrollError::ConfigParseError {
            path: file.to_string(),
            message: message.into(),
        }
    }

    fn validate_service(service: &ServiceConfig) -> PayrollResult<()> {
        let preview = &service.preview;
        if preview.default_ttl_secs == 0 {
            return Err(Self::invalid(
                "service.yaml",
                "preview.default_ttl_secs must be greater than zero",
            ));
        }
        if preview.default_ttl_secs > preview.max_ttl_secs {
            return Err(Self::invalid(
                "service.yaml",
                format!(
                    "preview.default_ttl_secs ({}) exceeds preview.max_ttl_secs ({})",
                    preview.default_ttl_secs, preview.max_ttl_secs
                ),
            ));
        }

        let rate = service.payroll.withholding_rate;
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(Self::invalid(
                "service.yaml",
                format!("payroll.withholding_rate must be in [0, 1), got {}", rate),
            ));
        }
        Ok(())
    }

    fn validate_workers(workers: &[Worker]) -> PayrollResult<()> {
        let mut seen = HashSet::new();
        for worker in workers {
            if !seen.insert(worker.id.as_str()) {
                return Err(Self::invalid(
                    "workers.yaml",
                    format!("duplicate worker id '{}'", worker.id),
                ));
            }
            if worker.daily_wage < Decimal::ZERO {
                return Err(Self::invalid(
                    "workers.yaml",
                    format!("worker '{}' has a negative daily wage", worker.id),
                ));
            }
        }
        Ok(())
    }

    fn validate_users(users: &[ApiUser], workers: &[Worker]) -> PayrollResult<()> {
        let mut tokens = HashSet::new();
        for user in users {
            if user.token.is_empty() {
                return Err(Self::invalid(
                    "users.yaml",
                    format!("user '{}' has an empty token", user.user_id),
                ));
            }
            if !tokens.insert(user.token.as_str()) {
                return Err(Self::invalid(
                    "users.yaml",
                    format!("user '{}' reuses another user's token", user.user_id),
                ));
            }
            match (&user.worker_id, user.role) {
                (None, Role::Worker) => {
                    return Err(Self::invalid(
                        "users.yaml",
                        format!("worker user '{}' has no worker_id", user.user_id),
                    ));
                }
                (Some(worker_id), _) if !workers.iter().any(|w| &w.id == worker_id) => {
                    return Err(Self::invalid(
                        "users.yaml",
                        format!(
                            "user '{}' refers to unknown worker '{}'",
                            user.user_id, worker_id
                        ),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the service settings.
    pub fn service(&self) -> &ServiceConfig {
        self.config.service()
    }

    /// Gets a worker by id.
    ///
    /// # Returns
    ///
    /// Returns the worker if found, or `UnknownWorker` error.
    pub fn get_worker(&self, worker_id: &str) -> PayrollResult<&Worker> {
        self.config
            .workers()
            .get(worker_id)
            .ok_or_else(|| PayrollError::UnknownWorker {
                worker_id: worker_id.to_string(),
            })
    }

    /// Finds the user a bearer token belongs to.
    pub fn find_user(&self, token: &str) -> Option<&ApiUser> {
        self.config.users().get(token)
    }
}
