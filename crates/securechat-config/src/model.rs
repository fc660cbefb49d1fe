// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the SecureChat synchronization core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level SecureChat configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecureChatConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Secure-messaging availability rules.
    #[serde(default)]
    pub availability: AvailabilityConfig,

    /// Transcript and unread-count synchronization settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// File upload and download limits.
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Secure-messaging availability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AvailabilityConfig {
    /// Media type a queue must support to count as a secure-messaging queue.
    #[serde(default = "default_messaging_media")]
    pub messaging_media: String,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            messaging_media: default_messaging_media(),
        }
    }
}

fn default_messaging_media() -> String {
    "messaging".to_string()
}

/// Transcript synchronization configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// How long to wait for the unread count before falling back to zero.
    #[serde(default = "default_unread_count_timeout_ms")]
    pub unread_count_timeout_ms: u64,

    /// Delay between showing the transcript and marking it read.
    #[serde(default = "default_mark_read_delay_ms")]
    pub mark_read_delay_ms: u64,
}

impl SyncConfig {
    pub fn unread_count_timeout(&self) -> Duration {
        Duration::from_millis(self.unread_count_timeout_ms)
    }

    pub fn mark_read_delay(&self) -> Duration {
        Duration::from_millis(self.mark_read_delay_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            unread_count_timeout_ms: default_unread_count_timeout_ms(),
            mark_read_delay_ms: default_mark_read_delay_ms(),
        }
    }
}

fn default_unread_count_timeout_ms() -> u64 {
    3_000
}

fn default_mark_read_delay_ms() -> u64 {
    6_000
}

/// File transfer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransferConfig {
    /// Maximum number of uploads that may be in flight or succeeded at once.
    #[serde(default = "default_max_uploads")]
    pub max_uploads: usize,

    /// Files larger than this are rejected before contacting the backend.
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Maximum number of downloads transferring bytes at the same time.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_uploads: default_max_uploads(),
            max_file_size_bytes: default_max_file_size_bytes(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
        }
    }
}

fn default_max_uploads() -> usize {
    25
}

fn default_max_file_size_bytes() -> u64 {
    25 * 1024 * 1024
}

fn default_max_concurrent_downloads() -> usize {
    4
}
