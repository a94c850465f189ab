use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::common::constants::{
    API_KEY_ENV, CREDENTIALS_ENV, DEFAULT_API_KEY_FILE, DEFAULT_CONCURRENCY, DEFAULT_CONFIG_FILE,
    DEFAULT_CREDENTIALS_FILE, LOOKUP_BASE_URL, OUTPUT_WORKSHEET,
};
use crate::common::error::{Result, ValidatorError};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub sheets: SheetsConfig,
    pub columns: ColumnsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub base_url: String,
    /// Literal key; takes precedence over `api_key_file`
    pub api_key: Option<String>,
    pub api_key_file: PathBuf,
    /// Per-request timeout; unset means requests may wait indefinitely
    pub timeout_seconds: Option<u64>,
    pub concurrency: usize,
    pub requests_per_min: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: LOOKUP_BASE_URL.to_string(),
            api_key: None,
            api_key_file: PathBuf::from(DEFAULT_API_KEY_FILE),
            timeout_seconds: None,
            concurrency: DEFAULT_CONCURRENCY,
            requests_per_min: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub credentials_file: PathBuf,
    pub output_worksheet: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            output_worksheet: OUTPUT_WORKSHEET.to_string(),
        }
    }
}

/// Optional column/row layout. Anything left unset is asked for on stdin.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub address_col: Option<u32>,
    pub postcode_col: Option<u32>,
    pub start_row: Option<u32>,
}

impl Config {
    /// Loads configuration from `path`, or from the default file when it exists.
    ///
    /// An explicitly given path must exist. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file found, using defaults");
                Config::default()
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ValidatorError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies `GETADDRESS_API_KEY` and `GOOGLE_APPLICATION_CREDENTIALS` when set and non-empty.
    pub fn apply_env_overrides<F>(&mut self, lookup_env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup_env(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.lookup.api_key = Some(key);
        }
        if let Some(path) = lookup_env(CREDENTIALS_ENV).filter(|v| !v.trim().is_empty()) {
            self.sheets.credentials_file = PathBuf::from(path);
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// The API key from the literal setting, or else read from `api_key_file`.
    pub fn resolve_api_key(&self) -> Result<String> {
        let key = match &self.api_key {
            Some(key) => key.clone(),
            None => fs::read_to_string(&self.api_key_file).map_err(|e| {
                ValidatorError::Config(format!(
                    "Failed to read API key file '{}': {}",
                    self.api_key_file.display(),
                    e
                ))
            })?,
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidatorError::Config("API key is empty".to_string()));
        }
        Ok(key.to_string())
    }
}
