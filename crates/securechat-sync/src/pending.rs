// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending-interaction aggregator.
//!
//! Merges four independently updating signals into one
//! [`PendingInteractionState`]. Every single-field update recomputes the
//! derived flag inside the same `watch` critical section, so no observer can
//! see a state where
//! `has_pending_interaction != (pending || unread > 0 || transferred) && !ongoing`.

use std::sync::{Arc, Mutex};

use securechat_core::{
    Engagement, InteractionSignals, InteractorState, SecureChatError, SignalCallback, SignalKind,
    SubscriptionToken,
};
use tokio::sync::watch;
use tracing::{debug, error};

/// A single input change delivered by one of the live signals.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalUpdate {
    PendingStatus(bool),
    UnreadCount(u32),
    EngagementState(InteractorState),
    CurrentEngagement(Option<Engagement>),
}

/// Aggregate secure-conversation state driving badges and entry points.
///
/// Inputs are only changed through [`apply`](Self::apply); the derived flag
/// has no setter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingInteractionState {
    pending_status: bool,
    unread_message_count: u32,
    engagement_state: InteractorState,
    current_engagement: Option<Engagement>,
    has_pending_interaction: bool,
}

impl PendingInteractionState {
    /// Apply one input change and recompute the derived flag.
    pub fn apply(&mut self, update: SignalUpdate) {
        match update {
            SignalUpdate::PendingStatus(value) => self.pending_status = value,
            SignalUpdate::UnreadCount(value) => self.unread_message_count = value,
            SignalUpdate::EngagementState(value) => self.engagement_state = value,
            SignalUpdate::CurrentEngagement(value) => self.current_engagement = value,
        }
        self.has_pending_interaction = (self.pending_status
            || self.unread_message_count > 0
            || self.has_transferred_conversation())
            && !self.has_ongoing_or_enqueueing_engagement();
    }

    pub fn pending_status(&self) -> bool {
        self.pending_status
    }

    pub fn unread_message_count(&self) -> u32 {
        self.unread_message_count
    }

    /// The current engagement is a secure conversation promoted to live.
    pub fn has_transferred_conversation(&self) -> bool {
        self.current_engagement
            .as_ref()
            .is_some_and(|e| e.is_transferred_secure_conversation)
    }

    /// The interactor reports `Engaged`, a live engagement object exists, or
    /// an enqueue is in progress.
    ///
    /// A transferred secure conversation object alone does not count as live;
    /// it is the pending interaction itself.
    pub fn has_ongoing_or_enqueueing_engagement(&self) -> bool {
        if matches!(self.engagement_state, InteractorState::Engaged) {
            return true;
        }
        let live = self
            .current_engagement
            .as_ref()
            .is_some_and(|e| !e.is_transferred_secure_conversation);
        live || self.engagement_state.is_enqueueing()
    }

    pub fn has_pending_interaction(&self) -> bool {
        self.has_pending_interaction
    }

    pub fn engagement_state(&self) -> InteractorState {
        self.engagement_state
    }
}

/// Live aggregator over [`InteractionSignals`].
///
/// Registers for all four signals on construction and unsubscribes every
/// token exactly once on [`dispose`](Self::dispose) or drop.
pub struct PendingInteraction {
    signals: Arc<dyn InteractionSignals>,
    tokens: Mutex<Vec<SubscriptionToken>>,
    state: Arc<watch::Sender<PendingInteractionState>>,
}

impl PendingInteraction {
    /// Subscribe to every signal.
    ///
    /// Fails with [`SecureChatError::Subscription`] naming the first signal
    /// whose registration returned no token. Tokens obtained before the
    /// failure are released before returning.
    pub fn new(signals: Arc<dyn InteractionSignals>) -> Result<Self, SecureChatError> {
        let (tx, _) = watch::channel(PendingInteractionState::default());
        let state = Arc::new(tx);
        let mut tokens = Vec::with_capacity(4);

        let registrations: [(SignalKind, Option<SubscriptionToken>); 4] = [
            (
                SignalKind::PendingStatus,
                signals.observe_pending_status(updater(&state, SignalUpdate::PendingStatus)),
            ),
            (
                SignalKind::UnreadCount,
                signals.observe_unread_count(updater(&state, SignalUpdate::UnreadCount)),
            ),
            (
                SignalKind::EngagementState,
                signals.observe_engagement_state(updater(&state, SignalUpdate::EngagementState)),
            ),
            (
                SignalKind::EngagementPresence,
                signals
                    .observe_current_engagement(updater(&state, SignalUpdate::CurrentEngagement)),
            ),
        ];

        let mut failed = None;
        for (signal, token) in registrations {
            match token {
                Some(token) => tokens.push(token),
                None if failed.is_none() => failed = Some(signal),
                None => {}
            }
        }

        if let Some(signal) = failed {
            error!(signal = %signal, "signal registration returned no token");
            for token in tokens {
                signals.unsubscribe(token);
            }
            return Err(SecureChatError::Subscription { signal });
        }

        debug!(count = tokens.len(), "pending-interaction signals registered");
        Ok(Self {
            signals,
            tokens: Mutex::new(tokens),
            state,
        })
    }

    /// Current aggregate state.
    pub fn state(&self) -> PendingInteractionState {
        self.state.borrow().clone()
    }

    pub fn has_pending_interaction(&self) -> bool {
        self.state.borrow().has_pending_interaction()
    }

    /// Receiver notified after every input change.
    pub fn subscribe(&self) -> watch::Receiver<PendingInteractionState> {
        self.state.subscribe()
    }

    /// Release every signal registration. Later calls do nothing.
    pub fn dispose(&self) {
        let tokens = match self.tokens.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        if tokens.is_empty() {
            return;
        }
        debug!(count = tokens.len(), "releasing pending-interaction signals");
        for token in tokens {
            self.signals.unsubscribe(token);
        }
    }
}

impl Drop for PendingInteraction {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn updater<T, F>(state: &Arc<watch::Sender<PendingInteractionState>>, wrap: F) -> SignalCallback<T>
where
    T: 'static,
    F: Fn(T) -> SignalUpdate + Send + Sync + 'static,
{
    let state = Arc::clone(state);
    Arc::new(move |value: T| {
        let update = wrap(value);
        state.send_modify(|s| s.apply(update));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use securechat_core::EngagementKind;

    fn engagement(transferred: bool) -> Engagement {
        Engagement {
            id: "eng-1".into(),
            kind: EngagementKind::Chat,
            is_transferred_secure_conversation: transferred,
        }
    }

    fn expected(state: &PendingInteractionState) -> bool {
        (state.pending_status()
            || state.unread_message_count() > 0
            || state.has_transferred_conversation())
            && !state.has_ongoing_or_enqueueing_engagement()
    }

    #[test]
    fn default_state_has_nothing_pending() {
        let state = PendingInteractionState::default();
        assert!(!state.has_pending_interaction());
        assert!(!state.has_ongoing_or_enqueueing_engagement());
    }

    #[test]
    fn unread_messages_make_interaction_pending() {
        let mut state = PendingInteractionState::default();
        state.apply(SignalUpdate::UnreadCount(2));
        assert!(state.has_pending_interaction());

        state.apply(SignalUpdate::UnreadCount(0));
        assert!(!state.has_pending_interaction());
    }

    #[test]
    fn live_engagement_suppresses_pending() {
        let mut state = PendingInteractionState::default();
        state.apply(SignalUpdate::PendingStatus(true));
        state.apply(SignalUpdate::CurrentEngagement(Some(engagement(false))));
        assert!(state.has_ongoing_or_enqueueing_engagement());
        assert!(!state.has_pending_interaction());
    }

    #[test]
    fn enqueueing_suppresses_pending() {
        let mut state = PendingInteractionState::default();
        state.apply(SignalUpdate::UnreadCount(1));
        state.apply(SignalUpdate::EngagementState(InteractorState::Enqueueing(
            EngagementKind::Audio,
        )));
        assert!(!state.has_pending_interaction());

        state.apply(SignalUpdate::EngagementState(InteractorState::Idle));
        assert!(state.has_pending_interaction());
    }

    #[test]
    fn engaged_status_suppresses_pending_without_engagement_object() {
        let mut state = PendingInteractionState::default();
        state.apply(SignalUpdate::PendingStatus(true));
        state.apply(SignalUpdate::EngagementState(InteractorState::Engaged));
        assert!(state.has_ongoing_or_enqueueing_engagement());
        assert!(!state.has_pending_interaction());

        state.apply(SignalUpdate::EngagementState(InteractorState::Ended));
        assert!(!state.has_ongoing_or_enqueueing_engagement());
        assert!(state.has_pending_interaction());
    }

    #[test]
    fn transferred_conversation_counts_as_pending() {
        let mut state = PendingInteractionState::default();
        state.apply(SignalUpdate::CurrentEngagement(Some(engagement(true))));
        assert!(state.has_transferred_conversation());
        assert!(!state.has_ongoing_or_enqueueing_engagement());
        assert!(state.has_pending_interaction());
    }

    fn arb_update() -> impl Strategy<Value = SignalUpdate> {
        let kind = prop_oneof![
            Just(EngagementKind::Chat),
            Just(EngagementKind::Audio),
            Just(EngagementKind::Video),
            Just(EngagementKind::Messaging),
        ];
        let interactor = prop_oneof![
            Just(InteractorState::Idle),
            kind.prop_map(InteractorState::Enqueueing),
            Just(InteractorState::Engaged),
            Just(InteractorState::Ended),
        ];
        prop_oneof![
            any::<bool>().prop_map(SignalUpdate::PendingStatus),
            (0u32..5).prop_map(SignalUpdate::UnreadCount),
            interactor.prop_map(SignalUpdate::EngagementState),
            proptest::option::of(any::<bool>())
                .prop_map(|t| SignalUpdate::CurrentEngagement(t.map(engagement))),
        ]
    }

    proptest! {
        /// Property: the derived flag matches its definition after every update.
        #[test]
        fn derived_flag_holds_after_every_update(
            updates in proptest::collection::vec(arb_update(), 0..64)
        ) {
            let mut state = PendingInteractionState::default();
            for update in updates {
                state.apply(update);
                prop_assert_eq!(state.has_pending_interaction(), expected(&state));
            }
        }
    }
}
