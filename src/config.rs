use serde::Deserialize;
use std::fs;

use crate::constants;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_pause_secs")]
    pub rate_limit_pause_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_seasons")]
    pub seasons: Vec<i32>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_base_url() -> String {
    constants::DEFAULT_API_BASE_URL.to_string()
}

fn default_per_page() -> u32 {
    constants::DEFAULT_PER_PAGE
}

fn default_max_pages() -> u32 {
    constants::DEFAULT_MAX_PAGES
}

fn default_pause_secs() -> u64 {
    constants::DEFAULT_RATE_LIMIT_PAUSE_SECS
}

fn default_seasons() -> Vec<i32> {
    (2020..=2024).collect()
}

fn default_data_dir() -> String {
    constants::DEFAULT_DATA_DIR.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            rate_limit_pause_secs: default_pause_secs(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            seasons: default_seasons(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to
    /// built-in defaults when the file is absent.
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        match fs::read_to_string(config_path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            ))),
        }
    }

    /// Resolves the stats API key from the environment. Never stored in
    /// the config file.
    pub fn api_key() -> Result<String> {
        Ok(std::env::var(constants::API_KEY_ENV)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}
