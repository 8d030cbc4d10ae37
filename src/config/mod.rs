//! Configuration module for the status service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Shutdown data file overriding the packaged table (`.csv` or `.json`)
    pub data_path: Option<PathBuf>,
    /// Directory of prebuilt site assets served for all other paths
    pub static_dir: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let raw_addr =
            env::var("USA_STATUS_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr.parse().map_err(|e| {
            AppError::Config(format!("Invalid USA_STATUS_BIND_ADDR {:?}: {}", raw_addr, e))
        })?;

        let data_path = non_empty_var("USA_STATUS_DATA_PATH").map(PathBuf::from);
        let static_dir = non_empty_var("USA_STATUS_STATIC_DIR").map(PathBuf::from);

        let log_level = env::var("USA_STATUS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("USA_STATUS_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            data_path,
            static_dir,
            log_level,
            log_json,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
