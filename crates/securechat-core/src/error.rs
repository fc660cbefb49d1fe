// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the SecureChat synchronization core.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// The four live signals the pending-interaction aggregator registers for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum SignalKind {
    /// "Visitor is waiting for an operator reply" push updates.
    PendingStatus,
    /// Unread secure-message counter push updates.
    UnreadCount,
    /// Engagement state machine transitions (enqueueing, engaged, ...).
    EngagementState,
    /// Appearance or disappearance of the current engagement.
    EngagementPresence,
}

/// Why a single file upload ended in the error state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UploadErrorKind {
    /// File exceeds the configured size limit.
    FileTooBig,
    /// The backend refuses this content type.
    UnsupportedFileType,
    /// The backend's malware scan rejected the file.
    SafetyCheckFailed,
    /// Transport failure while sending the bytes.
    Network,
    /// The local file could not be read.
    FileUnavailable,
    /// Removed from the upload list before it finished.
    Cancelled,
    /// Anything else.
    Generic,
}

/// The primary error type used across the collaborator traits and core components.
#[derive(Debug, Error)]
pub enum SecureChatError {
    /// Configuration errors (invalid values, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Errors reported by the engagement backend client (queue fetch, history fetch).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation did not complete within its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A signal source refused to hand out a subscription token.
    #[error("failed to subscribe to {signal} signal")]
    Subscription { signal: SignalKind },

    /// A file upload failed.
    #[error("upload failed: {kind}")]
    Upload { kind: UploadErrorKind },

    /// A file download failed.
    #[error("download failed: {message}")]
    Download { message: String },

    /// Caller supplied an argument the core cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SecureChatError {
    /// Shorthand for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        SecureChatError::Transport {
            message: message.into(),
            source: None,
        }
    }
}
