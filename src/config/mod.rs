//! Configuration loading and management for the site payroll service.
//!
//! This module provides functionality to load the service configuration from
//! YAML files: server and preview settings, payroll policy, the worker roster
//! and the API users.
//!
//! # Example
//!
//! ```no_run
//! use site_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Listening on {}", config.service().server.bind);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ApiUser, AppConfig, PayrollPolicy, PreviewSettings, Role, ServerSettings, ServiceConfig,
    UsersConfig, WorkersConfig, DEFAULT_PREVIEW_TTL_SECS,
};
