//! Runtime configuration.
//!
//! Resolved once when the host opens the clinic and passed down from there;
//! nothing below this module reads environment variables.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "CLINIC_DATABASE_PATH";
pub const BLOB_DIR_VAR: &str = "CLINIC_BLOB_DIR";
pub const BLOB_BASE_URL_VAR: &str = "CLINIC_BLOB_BASE_URL";
pub const LOG_FILTER_VAR: &str = "CLINIC_LOG";

pub const DEFAULT_DATABASE_PATH: &str = "clinic.db";
pub const DEFAULT_BLOB_DIR: &str = "blobs";
pub const DEFAULT_BLOB_BASE_URL: &str = "http://localhost:8080/files";
pub const DEFAULT_LOG_FILTER: &str = "clinic_core=info";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// Clinic configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClinicConfig {
    database_path: PathBuf,
    blob_dir: PathBuf,
    blob_base_url: String,
    log_filter: String,
}

impl ClinicConfig {
    pub fn new(
        database_path: PathBuf,
        blob_dir: PathBuf,
        blob_base_url: String,
        log_filter: String,
    ) -> Result<Self, ConfigError> {
        if database_path.as_os_str().is_empty() {
            return Err(ConfigError::Empty("database path"));
        }
        if blob_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty("blob directory"));
        }
        if blob_base_url.trim().is_empty() {
            return Err(ConfigError::Empty("blob base URL"));
        }

        Ok(Self {
            database_path,
            blob_dir,
            blob_base_url: blob_base_url.trim().to_string(),
            log_filter,
        })
    }

    /// Load `.env` if present, then read `CLINIC_*` variables, falling back
    /// to the defaults for unset or blank ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self::new(
            PathBuf::from(value(DATABASE_PATH_VAR, DEFAULT_DATABASE_PATH)),
            PathBuf::from(value(BLOB_DIR_VAR, DEFAULT_BLOB_DIR)),
            value(BLOB_BASE_URL_VAR, DEFAULT_BLOB_BASE_URL),
            value(LOG_FILTER_VAR, DEFAULT_LOG_FILTER),
        )
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn blob_dir(&self) -> &Path {
        &self.blob_dir
    }

    pub fn blob_base_url(&self) -> &str {
        &self.blob_base_url
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}
