use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream vPIC decoder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Endpoint the VIN is appended to
    #[serde(default = "default_decoder_base_url")]
    pub base_url: String,
    /// Whole-request timeout for a single decode call
    #[serde(default = "default_decoder_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Columnar export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Rows fetched per store page and written per Parquet row group
    #[serde(default = "default_export_batch_size")]
    pub batch_size: usize,
    /// File name suggested to clients downloading the export
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_decoder_base_url() -> String {
    DEFAULT_DECODER_BASE_URL.to_string()
}

fn default_decoder_timeout() -> Duration {
    Duration::from_secs(DEFAULT_DECODER_TIMEOUT_SECS)
}

fn default_user_agent() -> String {
    format!("vin-cache/{}", env!("CARGO_PKG_VERSION"))
}

fn default_export_batch_size() -> usize {
    DEFAULT_EXPORT_BATCH_SIZE
}

fn default_export_file_name() -> String {
    DEFAULT_EXPORT_FILE_NAME.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_decoder_base_url(),
            timeout: default_decoder_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_export_batch_size(),
            file_name: default_export_file_name(),
        }
    }
}

impl Config {
    /// Load configuration from `config_file`, writing a default file first if
    /// none exists. Values are layered: built-in defaults, then the TOML file,
    /// then `VIN_CACHE_*` environment variables.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)
                .with_context(|| format!("Failed to write default config file: {config_file}"))?;
            info!("Created default config file: {}", config_file);
        }

        let config = Self::figment(config_file)
            .extract::<Self>()
            .map_err(|e| AppError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: &str) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_NESTING_SEPARATOR))
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.export.batch_size == 0 {
            return Err(AppError::configuration("export.batch_size must be greater than 0"));
        }

        let base_url = url::Url::parse(&self.decoder.base_url).map_err(|e| {
            AppError::configuration(format!(
                "decoder.base_url '{}' is not a valid URL: {e}",
                self.decoder.base_url
            ))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::configuration(format!(
                "decoder.base_url must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        Ok(())
    }
}
