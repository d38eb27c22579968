use crate::config::Settings;
use crate::utils::error::{NationalizeError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub endpoint_path: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub supersede_in_flight: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Loads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NationalizeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NationalizeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` placeholders from the environment; unset variables stay literal.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NationalizeError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overwrites every field of `settings` this file sets.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(base_url) = &self.client.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(endpoint_path) = &self.client.endpoint_path {
            settings.endpoint_path = endpoint_path.clone();
        }
        if let Some(timeout) = self.client.timeout_seconds {
            settings.timeout_seconds = Some(timeout);
        }
        if let Some(supersede) = self.session.supersede_in_flight {
            settings.supersede_in_flight = supersede;
        }
        if let Some(json) = self.logging.json {
            settings.json_logs = json;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[client]
base_url = "https://names.example.com"
"#,
        )
        .unwrap();

        let mut settings = Settings::default();
        config.apply_to(&mut settings);

        assert_eq!(settings.base_url, "https://names.example.com");
        assert_eq!(settings.endpoint_path, "/api/v1/names/");
        assert_eq!(settings.timeout_seconds, None);
        assert!(settings.supersede_in_flight);
    }

    #[test]
    fn test_env_placeholder_substitution() {
        std::env::set_var("NATIONALIZE_TEST_BASE", "http://10.0.0.7:8000");
        let config = TomlConfig::from_toml_str(
            r#"
[client]
base_url = "${NATIONALIZE_TEST_BASE}"
endpoint_path = "${NATIONALIZE_TEST_UNSET_PATH}"
"#,
        )
        .unwrap();

        assert_eq!(config.client.base_url.as_deref(), Some("http://10.0.0.7:8000"));
        assert_eq!(
            config.client.endpoint_path.as_deref(),
            Some("${NATIONALIZE_TEST_UNSET_PATH}")
        );
    }

    #[test]
    fn test_invalid_toml() {
        let result = TomlConfig::from_toml_str("[client\nbase_url = 1");
        assert!(matches!(result, Err(NationalizeError::ConfigError { .. })));
    }
}
