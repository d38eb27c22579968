use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "nationalize")]
#[command(about = "Look up the likely nationalities of a name")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL of the names service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path of the names endpoint under the base URL
    #[arg(long)]
    pub endpoint_path: Option<String>,

    /// Give up on a lookup after this many seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Let overlapping lookups race instead of dropping superseded ones
    #[arg(long)]
    pub allow_race: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Names to look up once each; names are read from stdin when omitted
    pub names: Vec<String>,
}

impl CliConfig {
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(endpoint_path) = &self.endpoint_path {
            settings.endpoint_path = endpoint_path.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = Some(timeout);
        }
        if self.allow_race {
            settings.supersede_in_flight = false;
        }
        if self.json_logs {
            settings.json_logs = true;
        }

        Ok(settings)
    }
}
