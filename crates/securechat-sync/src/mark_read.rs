// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed "mark transcript as read" after the transcript is shown.
//!
//! The visitor must keep the transcript open for the whole delay; closing it
//! earlier cancels the pending mark through a [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use securechat_config::SyncConfig;
use securechat_core::TranscriptSource;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Schedules mark-as-read calls against a [`TranscriptSource`].
pub struct MarkReadScheduler {
    source: Arc<dyn TranscriptSource>,
    delay: Duration,
}

/// A scheduled mark-as-read that has not necessarily fired yet.
pub struct MarkReadHandle {
    cancel: CancellationToken,
    task: JoinHandle<bool>,
}

impl MarkReadScheduler {
    pub fn new(source: Arc<dyn TranscriptSource>, delay: Duration) -> Self {
        Self { source, delay }
    }

    pub fn from_config(source: Arc<dyn TranscriptSource>, config: &SyncConfig) -> Self {
        Self::new(source, config.mark_read_delay())
    }

    /// Start the delay. The transcript is marked read when it elapses
    /// unless the returned handle is cancelled first.
    pub fn schedule(&self) -> MarkReadHandle {
        let cancel = CancellationToken::new();
        let child = cancel.child_token();
        let source = Arc::clone(&self.source);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {
                    debug!("mark-as-read cancelled before delay elapsed");
                    false
                }
                _ = tokio::time::sleep(delay) => match source.mark_messages_read().await {
                    Ok(()) => {
                        debug!("transcript marked as read");
                        true
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to mark transcript as read");
                        false
                    }
                },
            }
        });

        MarkReadHandle { cancel, task }
    }
}

impl MarkReadHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the scheduled call; `true` if the transcript was marked read.
    pub async fn wait(self) -> bool {
        self.task.await.unwrap_or(false)
    }
}
