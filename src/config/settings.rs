use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::paths::Paths;
use crate::cache::DEFAULT_RATE_TTL_MINUTES;
use crate::error::{ConverterError, Result};

/// Default currency API endpoint
pub const DEFAULT_BASE_URL: &str = "https://free.currencyconverterapi.com/api/v5";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Local cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Output preferences
    #[serde(default)]
    pub output: OutputConfig,
}

/// API-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the currency API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional API key, sent as the `apiKey` query parameter
    pub key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key: None,
        }
    }
}

/// Local cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether the local store is consulted at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// How long a cached rate stays fresh
    #[serde(default = "default_rate_ttl_minutes")]
    pub rate_ttl_minutes: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_rate_ttl_minutes() -> u32 {
    DEFAULT_RATE_TTL_MINUTES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            rate_ttl_minutes: default_rate_ttl_minutes(),
        }
    }
}

/// Output formatting preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let paths = Paths::new()?;
        Self::load_from(&paths)
    }

    /// Load configuration from a specific paths instance
    pub fn load_from(paths: &Paths) -> Result<Self> {
        if !paths.config_exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&paths.config_file)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let paths = Paths::new()?;
        self.save_to(&paths)
    }

    /// Save configuration to a specific paths instance
    pub fn save_to(&self, paths: &Paths) -> Result<()> {
        paths.ensure_dirs()?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(&paths.config_file, &contents)?;

        // Config file may contain the API key
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&paths.config_file, perms)?;
        }

        Ok(())
    }

    /// Set the API key
    pub fn set_key(&mut self, key: String) {
        self.api.key = Some(key);
    }

    /// Apply a `section.key = value` assignment
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                url::Url::parse(value).map_err(|e| {
                    ConverterError::InvalidArgument(format!("api.base_url is not a URL: {e}"))
                })?;
                self.api.base_url = value.trim_end_matches('/').to_string();
            }
            "api.key" => self.set_key(value.to_string()),
            "cache.enabled" => {
                self.cache.enabled = value.parse().map_err(|_| {
                    ConverterError::InvalidArgument(
                        "cache.enabled must be 'true' or 'false'".to_string(),
                    )
                })?;
            }
            "cache.rate_ttl_minutes" => {
                self.cache.rate_ttl_minutes = value.parse().map_err(|_| {
                    ConverterError::InvalidArgument(
                        "cache.rate_ttl_minutes must be a whole number of minutes".to_string(),
                    )
                })?;
            }
            "output.format" => {
                if value != "pretty" && value != "json" {
                    return Err(ConverterError::InvalidArgument(
                        "output.format must be 'pretty' or 'json'".to_string(),
                    ));
                }
                self.output.format = value.to_string();
            }
            _ => {
                return Err(ConverterError::InvalidArgument(format!(
                    "Unknown config key: {}. Valid keys: api.base_url, api.key, cache.enabled, cache.rate_ttl_minutes, output.format",
                    key
                )));
            }
        }
        Ok(())
    }
}
