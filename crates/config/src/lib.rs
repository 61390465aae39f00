#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for yedctl
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/yedctl/config.toml)
//! - Environment variables
//! - CLI flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use yedctl_errors::{ConfigError, Error};

/// GitHub repository the yed release binaries are published under.
pub const RELEASE_REPO: &str = "atlet99/yaml-encrypter-decrypter";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub binary: BinaryConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub network: NetworkConfig,
}

/// Binary provisioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryConfig {
    /// Release tag to provision; `None` resolves the latest release.
    pub version: Option<String>,
    /// Cache root override; defaults to the per-user data directory.
    pub cache_dir: Option<PathBuf>,
    /// Pre-installed binary to use instead of provisioning one.
    pub path: Option<PathBuf>,
    #[serde(default = "default_release_host")]
    pub release_host: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    #[serde(default = "default_repo")]
    pub repo: String,
}

/// Rules sidecar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Pass `--validate-rules` to the binary on every invocation.
    #[serde(default)]
    pub validate: bool,
    /// Sidecar file the binary reads its rules from.
    #[serde(default = "default_rules_file")]
    pub file: PathBuf,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            version: None,
            cache_dir: None,
            path: None,
            release_host: default_release_host(),
            api_host: default_api_host(),
            repo: default_repo(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            validate: false,
            file: default_rules_file(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: 300, // 5 minutes
            connect_timeout: 30,
        }
    }
}

// Default value functions for serde

fn default_release_host() -> String {
    "https://github.com".to_string()
}

fn default_api_host() -> String {
    "https://api.github.com".to_string()
}

fn default_repo() -> String {
    RELEASE_REPO.to_string()
}

fn default_rules_file() -> PathBuf {
    PathBuf::from(".yed_config.yml")
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout() -> u64 {
    30
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("yedctl").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: &Option<PathBuf>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(version) = std::env::var("YEDCTL_VERSION") {
            if version.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "YEDCTL_VERSION".to_string(),
                    value: version,
                }
                .into());
            }
            self.binary.version = Some(version);
        }

        if let Ok(dir) = std::env::var("YEDCTL_CACHE_DIR") {
            self.binary.cache_dir = Some(PathBuf::from(dir));
        }

        if let Ok(path) = std::env::var("YEDCTL_BINARY") {
            self.binary.path = Some(PathBuf::from(path));
        }

        if let Ok(validate) = std::env::var("YEDCTL_VALIDATE") {
            self.rules.validate = match validate.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "YEDCTL_VALIDATE".to_string(),
                        value: validate,
                    }
                    .into())
                }
            };
        }

        if let Ok(timeout) = std::env::var("YEDCTL_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "YEDCTL_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        Ok(())
    }

    /// Version pin, if any. Empty strings are treated as unset.
    #[must_use]
    pub fn pinned_version(&self) -> Option<&str> {
        self.binary
            .version
            .as_deref()
            .filter(|v| !v.is_empty())
    }
}
