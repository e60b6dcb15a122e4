use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{DEFAULT_SOURCE_URL, EXPORT_TITLE};
use crate::error::{Result, SeatError};
use crate::export::ExportFormat;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Send the active filter as query parameters
    pub forward_filters: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOURCE_URL.to_string(),
            timeout_seconds: 15,
            forward_filters: true,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub output_dir: PathBuf,
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            output_dir: PathBuf::from("output"),
            title: EXPORT_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("logs") }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, then apply env overrides
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let config_content = fs::read_to_string(path).map_err(|e| {
                SeatError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::parse(&config_content)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Config::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config)
    }

    /// Apply `SEAT_MATRIX_*` overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SEAT_MATRIX_SOURCE_URL") {
            self.source.base_url = url;
        }
        if let Some(secs) = lookup("SEAT_MATRIX_TIMEOUT_SECS") {
            self.source.timeout_seconds = secs.trim().parse().map_err(|_| {
                SeatError::Config(format!("SEAT_MATRIX_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        if let Some(dir) = lookup("SEAT_MATRIX_LOG_DIR") {
            self.logging.dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.base_url.trim().is_empty() {
            return Err(SeatError::Config("source.base_url must not be empty".to_string()));
        }
        if self.source.timeout_seconds == 0 {
            return Err(SeatError::Config("source.timeout_seconds must be positive".to_string()));
        }
        Ok(())
    }
}
