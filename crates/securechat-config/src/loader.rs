// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading.
//!
//! Supports XDG hierarchy: `./securechat.toml` > `~/.config/securechat/securechat.toml`
//! > `/etc/securechat/securechat.toml` with environment variable overrides via
//! `SECURECHAT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SecureChatConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/securechat/securechat.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "securechat.toml";

/// Load the full hierarchy. Later layers win:
///
/// 1. Compiled defaults
/// 2. `/etc/securechat/securechat.toml` (system-wide)
/// 3. `~/.config/securechat/securechat.toml` (user XDG config)
/// 4. `./securechat.toml` (local directory)
/// 5. `SECURECHAT_*` environment variables
pub fn load_config() -> Result<SecureChatConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SecureChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SecureChatConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Defaults, then `path`, then `SECURECHAT_*` variables.
pub fn load_config_from_path(path: &Path) -> Result<SecureChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SecureChatConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The unextracted hierarchy, for callers that want figment metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SecureChatConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/securechat/securechat.toml` on this platform, if there is a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("securechat").join(LOCAL_CONFIG_FILE))
}

/// `SECURECHAT_<SECTION>_<KEY>` variables, mapped to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SECURECHAT_SYNC_UNREAD_COUNT_TIMEOUT_MS` must map to
/// `sync.unread_count_timeout_ms`, not `sync.unread.count.timeout.ms`.
fn env_provider() -> Env {
    Env::prefixed("SECURECHAT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("logging_", "logging.", 1)
            .replacen("availability_", "availability.", 1)
            .replacen("sync_", "sync.", 1)
            .replacen("transfer_", "transfer.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").expect("empty config is valid");
        assert_eq!(config, SecureChatConfig::default());
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[transfer]\nmax_uploads = 3\n")?;
            jail.set_env("SECURECHAT_TRANSFER_MAX_UPLOADS", "7");
            jail.set_env("SECURECHAT_SYNC_UNREAD_COUNT_TIMEOUT_MS", "1500");

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.transfer.max_uploads, 7);
            assert_eq!(config.sync.unread_count_timeout_ms, 1500);
            Ok(())
        });
    }

    #[test]
    fn local_file_is_picked_up() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(LOCAL_CONFIG_FILE, "[logging]\nlevel = \"debug\"\n")?;
            let config = load_config()?;
            assert_eq!(config.logging.level, "debug");
            Ok(())
        });
    }
}
