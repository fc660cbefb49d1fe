// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secure-conversation transcript access.

use async_trait::async_trait;

use crate::error::SecureChatError;
use crate::types::ChatMessage;

/// Backend access to the secure-conversation transcript.
///
/// Implementations may never complete a request when the underlying transport
/// is silently disconnected; callers that need a bounded wait must race the
/// call against a deadline themselves.
#[async_trait]
pub trait TranscriptSource: Send + Sync + 'static {
    /// Fetches the full transcript in chronological order.
    async fn fetch_chat_history(&self) -> Result<Vec<ChatMessage>, SecureChatError>;

    /// Fetches the number of operator messages the visitor has not read.
    async fn unread_message_count(&self) -> Result<u32, SecureChatError>;

    /// Marks every message in the transcript as read.
    async fn mark_messages_read(&self) -> Result<(), SecureChatError>;
}
