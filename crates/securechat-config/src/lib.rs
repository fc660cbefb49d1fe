// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the SecureChat synchronization core.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use securechat_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("max uploads: {}", config.transfer.max_uploads);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AvailabilityConfig, LoggingConfig, SecureChatConfig, SyncConfig, TransferConfig};

/// Load from the standard file hierarchy plus environment, then validate.
pub fn load_and_validate() -> Result<SecureChatConfig, Vec<ConfigError>> {
    checked(loader::load_config(), hierarchy_sources)
}

/// Load from an in-memory TOML document, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<SecureChatConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Load from one explicit file plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<SecureChatConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Run validation on a loaded config, or turn the load failure into
/// diagnostics. `sources` is only read on failure.
fn checked(
    loaded: Result<SecureChatConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<SecureChatConfig, Vec<ConfigError>> {
    let config =
        loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    Some((path.display().to_string(), content))
}

/// Every hierarchy file that exists, keyed the way figment reports it.
fn hierarchy_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG_FILE));

    [
        Some(local),
        loader::user_config_path(),
        Some(PathBuf::from(loader::SYSTEM_CONFIG_PATH)),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| read_source(&path))
    .collect()
}
