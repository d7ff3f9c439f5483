use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Global TidyWin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout for external commands, in milliseconds
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// How long to wait for a service to stop or start, in seconds
    #[serde(default = "default_service_wait_secs")]
    pub service_wait_secs: u64,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_command_timeout_ms() -> u64 {
    5000
}
fn default_service_wait_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_command_timeout_ms(),
            service_wait_secs: default_service_wait_secs(),
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the TidyWin data directory (~/.tidywin)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".tidywin")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize the TidyWin data directory
    pub fn init_dirs() -> Result<()> {
        let dir = Self::data_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        Ok(())
    }

    /// External command timeout as a `Duration`
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Service stop/start wait as a `Duration`
    pub fn service_wait(&self) -> Duration {
        Duration::from_secs(self.service_wait_secs)
    }
}
