//! Configuration management for flightcatalog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the platform config directory.
const APP_DIR_NAME: &str = "flightcatalog";

/// Default input document, relative to the working directory.
const DATA_FILE_NAME: &str = "flights.json";

/// Default output document, relative to the working directory.
const EXPORT_FILE_NAME: &str = "flights_updated.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTCATALOG_`, sections split
///    on `__`, e.g. `FLIGHTCATALOG_DISPLAY__PAGE_SIZE`)
/// 2. TOML config file at `~/.config/flightcatalog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file configuration.
    pub catalog: CatalogConfig,
    /// Output configuration.
    pub display: DisplayConfig,
}

/// Where flight documents are read from and written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Input document (`{"flights": [...]}`).
    /// Defaults to `flights.json` in the working directory.
    pub data_file: Option<PathBuf>,
    /// Where changed catalogs are written.
    /// Defaults to `flights_updated.json` in the working directory.
    pub export_file: Option<PathBuf>,
    /// Pretty-print JSON written by `export`.
    pub pretty: bool,
}

/// Terminal output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows shown before pausing. Set to 0 to disable paging.
    pub page_size: usize,
    /// strftime layout for timestamps in plain and table output.
    pub timestamp_format: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            export_file: None,
            pretty: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLIGHTCATALOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let format = &self.display.timestamp_format;
        if format.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "timestamp_format must not be empty".to_string(),
            });
        }

        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::ConfigValidation {
                message: format!("invalid timestamp_format: {format}"),
            });
        }

        Ok(())
    }

    /// Get the input document path, resolving defaults if not set.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.catalog
            .data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME))
    }

    /// Get the output document path, resolving defaults if not set.
    #[must_use]
    pub fn export_file(&self) -> PathBuf {
        self.catalog
            .export_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME))
    }

    /// Page size for paged output, or `None` when paging is off.
    #[must_use]
    pub fn page_size(&self) -> Option<usize> {
        (self.display.page_size > 0).then_some(self.display.page_size)
    }
}
