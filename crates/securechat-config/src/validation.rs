// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Range and name checks that serde cannot express on its own.

use std::str::FromStr;

use securechat_core::MediaType;

use crate::diagnostic::ConfigError;
use crate::model::SecureChatConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check every rule and report all violations at once.
pub fn validate_config(config: &SecureChatConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` must be one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if MediaType::from_str(config.availability.messaging_media.trim()).is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "availability.messaging_media `{}` is not a known media type",
                config.availability.messaging_media
            ),
        });
    }

    if config.sync.unread_count_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.unread_count_timeout_ms must be greater than 0".to_string(),
        });
    }

    if config.transfer.max_uploads == 0 {
        errors.push(ConfigError::Validation {
            message: "transfer.max_uploads must be at least 1".to_string(),
        });
    }

    if config.transfer.max_file_size_bytes == 0 {
        errors.push(ConfigError::Validation {
            message: "transfer.max_file_size_bytes must be greater than 0".to_string(),
        });
    }

    if config.transfer.max_concurrent_downloads == 0 {
        errors.push(ConfigError::Validation {
            message: "transfer.max_concurrent_downloads must be at least 1".to_string(),
        });
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
    fn default_config_is_valid() {
        assert!(validate_config(&SecureChatConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = SecureChatConfig::default();
        config.logging.level = "loud".into();
        config.availability.messaging_media = "carrier-pigeon".into();
        config.sync.unread_count_timeout_ms = 0;
        config.transfer.max_uploads = 0;
        config.transfer.max_file_size_bytes = 0;
        config.transfer.max_concurrent_downloads = 0;

        let errors = validate_config(&config).expect_err("config should be rejected");
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = SecureChatConfig::default();
        config.logging.level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
