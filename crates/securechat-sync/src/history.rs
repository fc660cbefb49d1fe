// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History + unread-count synchronizer.
//!
//! Fetches the transcript and the unread count concurrently and combines them
//! into one [`MessagesWithUnreadCount`]. The unread-count leg races a fixed
//! deadline: whichever of the real answer or the deadline arrives first is
//! used, the other is discarded. A missing count degrades to zero; a missing
//! transcript fails the whole load.

use std::sync::Arc;
use std::time::Duration;

use securechat_config::SyncConfig;
use securechat_core::{ChatMessage, SecureChatError, TranscriptSource};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Transcript annotated with how many operator messages are unread.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagesWithUnreadCount {
    pub messages: Vec<ChatMessage>,
    pub unread_count: u32,
}

/// Result of the unread-count leg after the race.
#[derive(Debug)]
enum UnreadOutcome {
    Received(Result<u32, SecureChatError>),
    TimedOut,
}

/// Loads a transcript together with its unread count.
pub struct TranscriptSynchronizer {
    source: Arc<dyn TranscriptSource>,
    unread_timeout: Duration,
}

impl TranscriptSynchronizer {
    pub fn new(source: Arc<dyn TranscriptSource>, unread_timeout: Duration) -> Self {
        Self {
            source,
            unread_timeout,
        }
    }

    pub fn from_config(source: Arc<dyn TranscriptSource>, config: &SyncConfig) -> Self {
        Self::new(source, config.unread_count_timeout())
    }

    pub fn unread_timeout(&self) -> Duration {
        self.unread_timeout
    }

    /// Fetch history and unread count concurrently and join the results.
    ///
    /// Resolves once the history has arrived and the unread count has either
    /// arrived or timed out. An unread-count request that loses the race keeps
    /// running in the background and its result is dropped.
    pub async fn load_messages_with_unread_count(
        &self,
    ) -> Result<MessagesWithUnreadCount, SecureChatError> {
        // The deadline starts before either request is issued.
        let deadline = tokio::time::sleep(self.unread_timeout);

        let (unread_tx, unread_rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            // Fails only if the deadline already won; nothing to do then.
            let _ = unread_tx.send(source.unread_message_count().await);
        });

        let unread_leg = async move {
            tokio::select! {
                received = unread_rx => match received {
                    Ok(result) => UnreadOutcome::Received(result),
                    Err(_) => UnreadOutcome::Received(Err(SecureChatError::Internal(
                        "unread count request was dropped".into(),
                    ))),
                },
                _ = deadline => UnreadOutcome::TimedOut,
            }
        };

        let (history, unread) = tokio::join!(self.source.fetch_chat_history(), unread_leg);
        combine(history, unread, self.unread_timeout)
    }

    /// Callback form of [`load_messages_with_unread_count`](Self::load_messages_with_unread_count).
    ///
    /// `callback` runs exactly once, on a spawned task.
    pub fn load_messages_with_unread_count_then<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<MessagesWithUnreadCount, SecureChatError>) + Send + 'static,
    {
        let synchronizer = Self {
            source: Arc::clone(&self.source),
            unread_timeout: self.unread_timeout,
        };
        tokio::spawn(async move {
            let result = synchronizer.load_messages_with_unread_count().await;
            callback(result);
        })
    }
}

fn combine(
    history: Result<Vec<ChatMessage>, SecureChatError>,
    unread: UnreadOutcome,
    timeout: Duration,
) -> Result<MessagesWithUnreadCount, SecureChatError> {
    let messages = history?;

    let unread_count = match unread {
        UnreadOutcome::Received(Ok(count)) => count,
        UnreadOutcome::Received(Err(e)) => {
            warn!(error = %e, "unread count unavailable, assuming zero");
            0
        }
        UnreadOutcome::TimedOut => {
            warn!(timeout = ?timeout, "unread count timed out, assuming zero");
            0
        }
    };

    debug!(
        messages = messages.len(),
        unread_count, "transcript synchronized"
    );
    Ok(MessagesWithUnreadCount {
        messages,
        unread_count,
    })
}
