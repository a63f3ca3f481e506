// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and sane
//! timeout values.

use thiserror::Error;

use crate::model::OpenClawConfig;

/// A configuration diagnostic, either a parse failure reported by Figment or
/// a semantic validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {message}")]
    Parse { message: String },

    #[error("invalid configuration: {message}")]
    Validation { message: String },
}

/// Render collected config errors as a plain-text report for stderr.
pub fn render_errors(errors: &[ConfigError]) -> String {
    let mut out = String::new();
    for err in errors {
        out.push_str("error: ");
        out.push_str(&err.to_string());
        out.push('\n');
    }
    out
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &OpenClawConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.relay.read_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.read_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.relay.channel_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.channel_capacity must be at least 1".to_string(),
        });
    }

    if !config.upstream.base_url.starts_with("http://")
        && !config.upstream.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "upstream.base_url must be an http(s) URL, got `{}`",
                config.upstream.base_url
            ),
        });
    }

    if let Some(key) = &config.platform.api_key {
        if key.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "platform.api_key must not be empty when set; omit it to disable \
                          platform models"
                    .to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = OpenClawConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = OpenClawConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn zero_read_timeout_fails_validation() {
        let mut config = OpenClawConfig::default();
        config.relay.read_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("read_timeout_secs"))));
    }

    #[test]
    fn blank_platform_key_fails_validation() {
        let mut config = OpenClawConfig::default();
        config.platform.api_key = Some("   ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("platform.api_key"))));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = OpenClawConfig::default();
        config.upstream.base_url = "ftp://example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = OpenClawConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.storage.database_path = "/tmp/test.db".to_string();
        config.platform.api_key = Some("sk-or-abc".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_render_one_per_line() {
        let errors = vec![
            ConfigError::Validation {
                message: "a".into(),
            },
            ConfigError::Parse {
                message: "b".into(),
            },
        ];
        let report = render_errors(&errors);
        assert_eq!(report.lines().count(), 2);
    }
}
