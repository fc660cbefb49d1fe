// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decides whether secure messaging can be offered to the visitor.
//!
//! Resolution is one-shot: authentication is checked first, then queue
//! metadata is fetched in a single batched call and filtered down to open
//! queues that serve the messaging media type. A transferred secure
//! conversation keeps messaging available even when no queue matches.

use std::str::FromStr;
use std::sync::Arc;

use securechat_config::AvailabilityConfig;
use securechat_core::{
    Engagement, MediaType, QueueDirectory, QueueId, SecureChatError, VisitorSession,
};
use tracing::{debug, warn};

/// Why secure messaging is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailableReason {
    /// These queues are open and accept messaging.
    Queues(Vec<QueueId>),
    /// No queue matched, but the visitor already has a transferred thread.
    Transferred,
}

/// Why secure messaging is not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    EmptyQueue,
    Unauthenticated,
}

/// Outcome of a single availability resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityStatus {
    Available(AvailableReason),
    Unavailable(UnavailableReason),
}

impl AvailabilityStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityStatus::Available(_))
    }
}

/// Resolves [`AvailabilityStatus`] against the backend's queue directory.
pub struct AvailabilityResolver {
    directory: Arc<dyn QueueDirectory>,
    session: Arc<dyn VisitorSession>,
    messaging_media: MediaType,
}

impl AvailabilityResolver {
    pub fn new(
        directory: Arc<dyn QueueDirectory>,
        session: Arc<dyn VisitorSession>,
        messaging_media: MediaType,
    ) -> Self {
        Self {
            directory,
            session,
            messaging_media,
        }
    }

    /// Build a resolver using the media type named in `config`.
    pub fn from_config(
        directory: Arc<dyn QueueDirectory>,
        session: Arc<dyn VisitorSession>,
        config: &AvailabilityConfig,
    ) -> Result<Self, SecureChatError> {
        let media = MediaType::from_str(config.messaging_media.trim()).map_err(|_| {
            SecureChatError::Config(format!(
                "unknown messaging media type `{}`",
                config.messaging_media
            ))
        })?;
        Ok(Self::new(directory, session, media))
    }

    /// Resolve using the session's current authentication and engagement.
    pub async fn resolve(
        &self,
        queue_ids: &[QueueId],
    ) -> Result<AvailabilityStatus, SecureChatError> {
        let is_authenticated = self.session.is_authenticated();
        let engagement = self.session.current_engagement();
        self.resolve_with(queue_ids, is_authenticated, engagement.as_ref())
            .await
    }

    /// Resolve with explicitly supplied authentication and engagement state.
    ///
    /// An empty `queue_ids` list means "use the site's default queues".
    /// Directory failures are returned to the caller as-is; nothing is retried.
    pub async fn resolve_with(
        &self,
        queue_ids: &[QueueId],
        is_authenticated: bool,
        current_engagement: Option<&Engagement>,
    ) -> Result<AvailabilityStatus, SecureChatError> {
        for id in queue_ids.iter().filter(|id| !id.is_well_formed()) {
            warn!(queue_id = %id, "malformed queue id");
        }

        if !is_authenticated {
            debug!("secure messaging unavailable: visitor is not authenticated");
            return Ok(AvailabilityStatus::Unavailable(
                UnavailableReason::Unauthenticated,
            ));
        }

        let queues = if queue_ids.is_empty() {
            self.directory
                .list_queues()
                .await?
                .into_iter()
                .filter(|q| q.is_default)
                .collect()
        } else {
            self.directory.fetch_queues(queue_ids).await?
        };

        let matching: Vec<QueueId> = queues
            .into_iter()
            .filter(|q| q.accepts(self.messaging_media))
            .map(|q| q.id)
            .collect();

        if !matching.is_empty() {
            debug!(count = matching.len(), "secure messaging available via queues");
            return Ok(AvailabilityStatus::Available(AvailableReason::Queues(
                matching,
            )));
        }

        if current_engagement.is_some_and(|e| e.is_transferred_secure_conversation) {
            debug!("secure messaging available via transferred conversation");
            return Ok(AvailabilityStatus::Available(AvailableReason::Transferred));
        }

        Ok(AvailabilityStatus::Unavailable(UnavailableReason::EmptyQueue))
    }
}
