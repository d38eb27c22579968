#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/v1/names/";
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Fully resolved client settings (defaults, then TOML, then flags).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub endpoint_path: String,
    pub timeout_seconds: Option<u64>,
    pub supersede_in_flight: bool,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout_seconds: None,
            supersede_in_flight: true,
            json_logs: false,
        }
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn supersede_in_flight(&self) -> bool {
        self.supersede_in_flight
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("client.base_url", &self.base_url)?;
        validate_non_empty_string("client.endpoint_path", &self.endpoint_path)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_range("client.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}
