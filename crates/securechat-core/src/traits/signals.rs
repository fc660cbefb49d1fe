// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live signal registration for the pending-interaction aggregator.

use crate::subscription::{SignalCallback, SubscriptionToken};
use crate::types::{Engagement, InteractorState};

/// Push-style sources of secure-conversation state.
///
/// Each `observe_*` call registers a callback and returns a token, or `None`
/// when the source could not register it. Implementations are expected to
/// deliver the current value right after registration.
///
/// [`unsubscribe`](InteractionSignals::unsubscribe) must be idempotent and
/// safe to call from any thread; a second call for the same token is a no-op.
pub trait InteractionSignals: Send + Sync + 'static {
    /// Whether the visitor has a secure conversation awaiting an operator.
    fn observe_pending_status(&self, callback: SignalCallback<bool>) -> Option<SubscriptionToken>;

    /// Number of unread operator messages in the secure conversation.
    fn observe_unread_count(&self, callback: SignalCallback<u32>) -> Option<SubscriptionToken>;

    /// Engagement state machine transitions.
    fn observe_engagement_state(
        &self,
        callback: SignalCallback<InteractorState>,
    ) -> Option<SubscriptionToken>;

    /// The current engagement appearing, changing, or going away.
    fn observe_current_engagement(
        &self,
        callback: SignalCallback<Option<Engagement>>,
    ) -> Option<SubscriptionToken>;

    /// Cancels the registration behind `token`.
    fn unsubscribe(&self, token: SubscriptionToken);
}
