//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the endpoint must be an
//! `http://` or `https://` URL and numeric limits must be positive. Number
//! formats are checked while parsing.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::format::NumberFormat;

/// Longest accepted per-request timeout.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// User configuration file.
///
/// # Example
///
/// ```toml
/// [service]
/// endpoint = "http://localhost:9090"
/// timeout_secs = 10
///
/// [resolver]
/// max_depth = 32
/// cache_descriptors = false
///
/// [display]
/// number_format = "%.2f"
///
/// [input]
/// strict = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Bridge connection settings
    pub service: Option<ServiceConfig>,

    /// Schema resolution settings
    pub resolver: Option<ResolverConfig>,

    /// Display settings
    pub display: Option<DisplayConfig>,

    /// User input settings
    pub input: Option<InputConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(service) = &self.service {
            service.validate()?;
        }
        if let Some(resolver) = &self.resolver {
            resolver.validate()?;
        }
        Ok(())
    }
}

/// Bridge connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Bridge base URL
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            validate_endpoint(endpoint)?;
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 || secs > MAX_TIMEOUT_SECS {
                return Err(ConfigError::InvalidValue(format!(
                    "timeout_secs must be between 1 and {}, got {}",
                    MAX_TIMEOUT_SECS, secs
                )));
            }
        }
        Ok(())
    }
}

/// Check that an endpoint is an absolute HTTP(S) URL.
pub fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let rest = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidValue(format!(
            "invalid endpoint '{}', expected http://host[:port]",
            endpoint
        ))),
    }
}

/// Schema resolution settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Maximum composite nesting
    pub max_depth: Option<usize>,

    /// Memoise descriptors within one resolution run
    pub cache_descriptors: Option<bool>,
}

impl ResolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == Some(0) {
            return Err(ConfigError::InvalidValue(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Display settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// printf-style format for incoming numbers
    pub number_format: Option<NumberFormat>,
}

/// User input settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Reject non-numeric text in numeric fields
    pub strict: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod file_config {
        use super::*;

        #[test]
        fn defaults() {
            let config = FileConfig::default();
            assert!(config.service.is_none());
            assert!(config.resolver.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn roundtrip() {
            let config = FileConfig {
                service: Some(ServiceConfig {
                    endpoint: Some("http://robot.local:9090".to_string()),
                    timeout_secs: Some(3),
                }),
                resolver: Some(ResolverConfig {
                    max_depth: Some(8),
                    cache_descriptors: Some(true),
                }),
                display: Some(DisplayConfig {
                    number_format: Some(NumberFormat::Fixed(3)),
                }),
                input: Some(InputConfig { strict: Some(true) }),
            };

            let toml = toml::to_string_pretty(&config).unwrap();
            let parsed: FileConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config, parsed);
        }

        #[test]
        fn number_format_parsed_from_string() {
            let parsed: FileConfig = toml::from_str(
                r#"
                [display]
                number_format = "%d"
                "#,
            )
            .unwrap();
            assert_eq!(
                parsed.display.unwrap().number_format,
                Some(NumberFormat::Integer)
            );
        }

        #[test]
        fn bad_number_format_rejected() {
            let result: Result<FileConfig, _> = toml::from_str(
                r#"
                [display]
                number_format = "%z"
                "#,
            );
            assert!(result.is_err());
        }

        #[test]
        fn oversized_precision_rejected() {
            let result: Result<FileConfig, _> = toml::from_str(
                r#"
                [display]
                number_format = "%.100000000f"
                "#,
            );
            let err = result.unwrap_err().to_string();
            assert!(err.contains("exceeds 17"), "{}", err);
        }

        #[test]
        fn reject_unknown_fields() {
            let result: Result<FileConfig, _> = toml::from_str(
                r#"
                [service]
                endpoint = "http://localhost:9090"
                port = 9090
                "#,
            );
            assert!(result.is_err());
        }
    }

    mod service_config {
        use super::*;

        #[test]
        fn valid_endpoints() {
            assert!(validate_endpoint("http://localhost:9090").is_ok());
            assert!(validate_endpoint("https://bridge.example.com").is_ok());
        }

        #[test]
        fn invalid_endpoints() {
            assert!(validate_endpoint("").is_err());
            assert!(validate_endpoint("http://").is_err());
            assert!(validate_endpoint("ws://localhost:9090").is_err());
            assert!(validate_endpoint("localhost:9090").is_err());
        }

        #[test]
        fn zero_timeout_rejected() {
            let config = ServiceConfig {
                timeout_secs: Some(0),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn huge_timeout_rejected() {
            let config = ServiceConfig {
                timeout_secs: Some(MAX_TIMEOUT_SECS + 1),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    mod resolver_config {
        use super::*;

        #[test]
        fn zero_depth_rejected() {
            let config = ResolverConfig {
                max_depth: Some(0),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn positive_depth_accepted() {
            let config = ResolverConfig {
                max_depth: Some(1),
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }
}
