//! Runtime configuration loaded from the environment.
//!
//! Artifact locations are intentionally absent here: they are fixed relative
//! to the crate directory (see `artifacts::repo_fs::default_root`).

use std::env;

/// Title reported by the root endpoint and the startup log.
pub const PROJECT_NAME: &str = "Heart Disease Prediction API";

/// Snapshot of configuration values consumed by the server.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub bind_addr: String,
    pub log_level: String,
    pub project_name: &'static str,
    pub version: &'static str,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            bind_addr: env_or("HEARTRISK_BIND", "0.0.0.0:8000"),
            log_level: env_or("HEARTRISK_LOG_LEVEL", "info"),
            project_name: PROJECT_NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
