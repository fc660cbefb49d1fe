// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.

use std::path::Path;

use securechat_config::SecureChatConfig;
use securechat_core::{ChatItem, ChatMessage, SecureChatError};
use securechat_sync::place_divider;
use tracing::debug;

pub fn print_config(config: &SecureChatConfig) -> Result<(), SecureChatError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| SecureChatError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

/// Validate `path`, print diagnostics, and return the process exit code.
pub fn check(path: &Path) -> i32 {
    match securechat_config::load_and_validate_path(path) {
        Ok(_) => {
            println!("{}: configuration is valid", path.display());
            0
        }
        Err(errors) => {
            securechat_config::render_errors(&errors);
            1
        }
    }
}

pub fn print_divided_transcript(path: &Path, unread: usize) -> Result<(), SecureChatError> {
    let items = divided_transcript(path, unread)?;
    let rendered = serde_json::to_string_pretty(&items)
        .map_err(|e| SecureChatError::Internal(format!("failed to render transcript: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Read a JSON transcript and return its rows with the unread divider placed.
pub fn divided_transcript(path: &Path, unread: usize) -> Result<Vec<ChatItem>, SecureChatError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SecureChatError::InvalidInput(format!("cannot read {}: {e}", path.display()))
    })?;
    let messages: Vec<ChatMessage> = serde_json::from_str(&content).map_err(|e| {
        SecureChatError::InvalidInput(format!("{} is not a transcript: {e}", path.display()))
    })?;
    debug!(messages = messages.len(), unread, "placing unread divider");

    let items = messages.into_iter().map(ChatItem::from).collect();
    Ok(place_divider(items, unread, ChatItem::UnreadMessageDivider))
}
