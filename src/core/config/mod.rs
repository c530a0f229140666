//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! An explicit path (from `--config`) is used as-is and must exist.
//! Otherwise these are searched in order:
//! 1. `$ROSDESK_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/rosdesk/config.toml`
//! 3. `~/.rosdesk/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use rosdesk::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("Endpoint: {}", config.endpoint());
//! println!("Timeout: {:?}", config.timeout());
//! ```

pub mod schema;

pub use schema::{DisplayConfig, FileConfig, InputConfig, ResolverConfig, ServiceConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::format::NumberFormat;
use super::resolver::{ResolverOptions, DEFAULT_MAX_DEPTH};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ROSDESK_CONFIG";

/// Bridge endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9090";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File contents
    pub file: FileConfig,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` is missing, or if a config file exists
    /// but cannot be parsed or fails validation. Missing default files are
    /// not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with(explicit, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Load with an injected environment and home directory.
    fn load_with(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::locate(&env, home, &mut warnings),
        };

        let file = match &path {
            Some(path) => Self::read_config(path)?,
            None => FileConfig::default(),
        };
        file.validate()?;

        if let Some(path) = &path {
            tracing::debug!(path = %path.display(), "loaded config");
        }

        Ok(ConfigLoadResult {
            config: Config { file, path },
            warnings,
        })
    }

    /// Find the first existing config file in the default locations.
    fn locate(
        env: &impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Option<PathBuf> {
        // 1. Check $ROSDESK_CONFIG
        if let Some(path) = env(CONFIG_ENV).map(PathBuf::from) {
            if path.exists() {
                return Some(path);
            }
            warnings.push(ConfigWarning {
                message: format!("{} points to a missing file, ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/rosdesk/config.toml
        if let Some(xdg_home) = env("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("rosdesk/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.rosdesk/config.toml
        home.map(|h| h.join(".rosdesk/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical config path.
    ///
    /// Returns `~/.rosdesk/config.toml`.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".rosdesk/config.toml"))
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Refuses to replace an existing
    /// file unless `force` is set.
    pub fn write(path: &Path, config: &FileConfig, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Write to temp file in same directory (for atomic rename)
        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// A config file with every setting spelled out at its default.
    pub fn defaults_file() -> FileConfig {
        FileConfig {
            service: Some(ServiceConfig {
                endpoint: Some(DEFAULT_ENDPOINT.to_string()),
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            }),
            resolver: Some(ResolverConfig {
                max_depth: Some(DEFAULT_MAX_DEPTH),
                cache_descriptors: Some(false),
            }),
            display: Some(DisplayConfig {
                number_format: Some(NumberFormat::default()),
            }),
            input: Some(InputConfig {
                strict: Some(false),
            }),
        }
    }

    /// Every setting at its effective value, defaults filled in.
    pub fn effective(&self) -> FileConfig {
        FileConfig {
            service: Some(ServiceConfig {
                endpoint: Some(self.endpoint().to_string()),
                timeout_secs: Some(self.timeout().as_secs()),
            }),
            resolver: Some(ResolverConfig {
                max_depth: Some(self.max_depth()),
                cache_descriptors: Some(self.cache_descriptors()),
            }),
            display: Some(DisplayConfig {
                number_format: Some(self.number_format()),
            }),
            input: Some(InputConfig {
                strict: Some(self.strict_input()),
            }),
        }
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the bridge endpoint.
    ///
    /// Defaults to `http://localhost:9090`.
    pub fn endpoint(&self) -> &str {
        self.file
            .service
            .as_ref()
            .and_then(|s| s.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Get the per-request timeout.
    ///
    /// Defaults to 10 seconds.
    pub fn timeout(&self) -> Duration {
        let secs = self
            .file
            .service
            .as_ref()
            .and_then(|s| s.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Get the maximum composite nesting depth.
    pub fn max_depth(&self) -> usize {
        self.file
            .resolver
            .as_ref()
            .and_then(|r| r.max_depth)
            .unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Check if descriptor caching is enabled.
    ///
    /// Defaults to `false`.
    pub fn cache_descriptors(&self) -> bool {
        self.file
            .resolver
            .as_ref()
            .and_then(|r| r.cache_descriptors)
            .unwrap_or(false)
    }

    /// Get the display format for numbers.
    ///
    /// Defaults to `%.2f`.
    pub fn number_format(&self) -> NumberFormat {
        self.file
            .display
            .as_ref()
            .and_then(|d| d.number_format)
            .unwrap_or_default()
    }

    /// Check if strict input validation is enabled.
    ///
    /// Defaults to `false`.
    pub fn strict_input(&self) -> bool {
        self.file
            .input
            .as_ref()
            .and_then(|i| i.strict)
            .unwrap_or(false)
    }

    /// Resolver settings derived from this config.
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_depth: self.max_depth(),
            cache_descriptors: self.cache_descriptors(),
            fetch_timeout: Some(self.timeout()),
        }
    }

    /// Override the endpoint (from a CLI flag).
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the endpoint is not an HTTP(S) URL.
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<(), ConfigError> {
        schema::validate_endpoint(endpoint)?;
        self.file
            .service
            .get_or_insert_with(ServiceConfig::default)
            .endpoint = Some(endpoint.to_string());
        Ok(())
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
