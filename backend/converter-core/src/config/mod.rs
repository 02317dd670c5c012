//! Converter configuration stored as `config.json` in the config directory.
//!
//! Lookup order for the directory:
//! 1. `FXCONV_CONFIG_DIR` environment variable
//! 2. Platform config directory via `dirs` (`~/.config/fxconv` on Linux)
//!
//! `FXCONV_API_BASE` overrides the feed URL after the file is loaded. A `.env`
//! file in the working directory is read first if present.

use crate::DEFAULT_API_BASE;
use crate::error::config::ConfigError;
use crate::error::rates_client::RatesClientError;
use crate::rates_client::{DEFAULT_TIMEOUT_DURATION, RatesClient};

use common::ErrorLocation;

use std::env;
use std::fs;
use std::io;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const APP_DIR_NAME: &str = "fxconv";
pub const CONFIG_DIR_ENV: &str = "FXCONV_CONFIG_DIR";
pub const API_BASE_ENV: &str = "FXCONV_API_BASE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConverterConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_DURATION.as_secs()
}

/// Directory holding `config.json`.
///
/// # Errors
///
/// Returns [`ConfigError::DirectoryNotFound`] if no override is set and the
/// platform has no config directory.
pub fn resolve_config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
        info!("Using {CONFIG_DIR_ENV} override: {custom_dir}");
        return Ok(PathBuf::from(custom_dir));
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Read `.env` from the working directory if one exists.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded .env from: {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to parse .env: {e}"),
    }
}

impl ConverterConfig {
    /// Read `config.json` from `config_dir`, or defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        match read_config_file(&config_path)? {
            Some(config) => Ok(config),
            None => {
                info!("No config at {}, using defaults", config_path.display());
                Ok(Self::default())
            }
        }
    }

    /// Like [`load`](Self::load), but writes the defaults out when the file is
    /// missing so the user has something to edit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file is invalid or the defaults
    /// cannot be written.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if let Some(config) = read_config_file(&config_path)? {
            return Ok(config);
        }

        let config = Self::default();
        config.save(config_dir)?;
        info!("Wrote default config to {}", config_path.display());
        Ok(config)
    }

    /// Write `config.json` into `config_dir`, creating the directory.
    ///
    /// The file is replaced by rename, so readers never see a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, serialization or any write step fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let staging_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        fs::create_dir_all(config_dir).map_err(write_error(config_dir))?;
        fs::write(&staging_path, json).map_err(write_error(&staging_path))?;
        fs::rename(&staging_path, &config_path).map_err(write_error(&config_path))?;

        debug!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Replace fields with values from the environment, then re-validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override is invalid.
    pub fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(api_base) = env::var(API_BASE_ENV) {
            info!("Using {API_BASE_ENV} override: {api_base}");
            self.api_base = api_base;
        }

        self.validate()?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid api_base URL: {}", self.api_base),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "request_timeout_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the feed client described by this config.
    pub fn rates_client(&self) -> Result<RatesClient, RatesClientError> {
        RatesClient::new(&self.api_base, self.request_timeout())
    }
}

/// Parse and validate the file at `path`. `Ok(None)` when it does not exist.
fn read_config_file(path: &Path) -> Result<Option<ConverterConfig>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let config: ConverterConfig =
        serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    config.validate()?;

    info!("Config loaded from {}", path.display());
    Ok(Some(config))
}

#[track_caller]
fn write_error(path: &Path) -> impl FnOnce(io::Error) -> ConfigError {
    let location = ErrorLocation::from(Location::caller());
    let path = path.to_path_buf();
    move |source| ConfigError::WriteError {
        location,
        path,
        source,
    }
}
