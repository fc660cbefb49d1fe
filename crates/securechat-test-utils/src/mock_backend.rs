// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock engagement backend for deterministic testing.
//!
//! `MockBackend` implements the queue, session, transcript, and signal
//! collaborator traits in memory. Replies can be immediate, delayed, or never
//! arrive, and every call that matters to the core is counted.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use securechat_core::{
    ChatMessage, Engagement, InteractionSignals, InteractorState, Queue, QueueDirectory, QueueId,
    SecureChatError, SignalCallback, SignalHub, SignalKind, SubscriptionToken, TranscriptSource,
    VisitorSession,
};

/// How a mocked request answers.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    /// Answer right away.
    Ready(Result<T, String>),
    /// Answer after the given delay (use paused tokio time in tests).
    After(Duration, Result<T, String>),
    /// Never answer, like a silently disconnected transport.
    Never,
}

impl<T: Clone> Reply<T> {
    pub fn ok(value: T) -> Self {
        Reply::Ready(Ok(value))
    }

    pub fn err(message: impl Into<String>) -> Self {
        Reply::Ready(Err(message.into()))
    }

    async fn resolve(&self) -> Result<T, SecureChatError> {
        let result = match self {
            Reply::Ready(result) => result.clone(),
            Reply::After(delay, result) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            Reply::Never => std::future::pending().await,
        };
        result.map_err(SecureChatError::transport)
    }
}

/// In-memory stand-in for the engagement backend client.
pub struct MockBackend {
    queues: Mutex<Vec<Queue>>,
    queue_error: Mutex<Option<String>>,
    queue_fetches: AtomicUsize,
    authenticated: AtomicBool,
    engagement: Mutex<Option<Engagement>>,
    history: Mutex<Reply<Vec<ChatMessage>>>,
    unread: Mutex<Reply<u32>>,
    unread_completed: AtomicUsize,
    mark_read: Mutex<Reply<()>>,
    mark_read_calls: AtomicUsize,
    pending_status: SignalHub<bool>,
    unread_count: SignalHub<u32>,
    engagement_state: SignalHub<InteractorState>,
    current_engagement: SignalHub<Option<Engagement>>,
    refused: Mutex<HashSet<SignalKind>>,
    unsubscribe_calls: Mutex<HashMap<SignalKind, usize>>,
}

impl MockBackend {
    /// An authenticated visitor, no queues, empty transcript, zero unread.
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(Vec::new()),
            queue_error: Mutex::new(None),
            queue_fetches: AtomicUsize::new(0),
            authenticated: AtomicBool::new(true),
            engagement: Mutex::new(None),
            history: Mutex::new(Reply::ok(Vec::new())),
            unread: Mutex::new(Reply::ok(0)),
            unread_completed: AtomicUsize::new(0),
            mark_read: Mutex::new(Reply::ok(())),
            mark_read_calls: AtomicUsize::new(0),
            pending_status: SignalHub::with_initial(SignalKind::PendingStatus, false),
            unread_count: SignalHub::with_initial(SignalKind::UnreadCount, 0),
            engagement_state: SignalHub::with_initial(
                SignalKind::EngagementState,
                InteractorState::Idle,
            ),
            current_engagement: SignalHub::with_initial(SignalKind::EngagementPresence, None),
            refused: Mutex::new(HashSet::new()),
            unsubscribe_calls: Mutex::new(HashMap::new()),
        }
    }

    // --- Queue directory ---

    pub fn with_queues(self, queues: Vec<Queue>) -> Self {
        *self.queues.lock().unwrap() = queues;
        self
    }

    /// Make every subsequent queue fetch fail with `message`.
    pub fn fail_queue_fetch(&self, message: impl Into<String>) {
        *self.queue_error.lock().unwrap() = Some(message.into());
    }

    pub fn queue_fetch_count(&self) -> usize {
        self.queue_fetches.load(Ordering::SeqCst)
    }

    // --- Session ---

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }

    /// Set the engagement returned by `current_engagement()` without publishing it.
    pub fn set_engagement(&self, engagement: Option<Engagement>) {
        *self.engagement.lock().unwrap() = engagement;
    }

    // --- Transcript ---

    pub fn reply_history(&self, reply: Reply<Vec<ChatMessage>>) {
        *self.history.lock().unwrap() = reply;
    }

    pub fn reply_unread(&self, reply: Reply<u32>) {
        *self.unread.lock().unwrap() = reply;
    }

    pub fn reply_mark_read(&self, reply: Reply<()>) {
        *self.mark_read.lock().unwrap() = reply;
    }

    /// Unread-count requests that ran to completion, including ones whose
    /// result was discarded by the caller.
    pub fn unread_requests_completed(&self) -> usize {
        self.unread_completed.load(Ordering::SeqCst)
    }

    pub fn mark_read_count(&self) -> usize {
        self.mark_read_calls.load(Ordering::SeqCst)
    }

    // --- Signals ---

    /// Registration for `signal` will return no token.
    pub fn refuse_signal(&self, signal: SignalKind) {
        self.refused.lock().unwrap().insert(signal);
    }

    pub fn publish_pending_status(&self, value: bool) {
        self.pending_status.publish(value);
    }

    pub fn publish_unread_count(&self, value: u32) {
        self.unread_count.publish(value);
    }

    pub fn publish_engagement_state(&self, value: InteractorState) {
        self.engagement_state.publish(value);
    }

    /// Publish a new current engagement and make it the session's engagement.
    pub fn publish_current_engagement(&self, value: Option<Engagement>) {
        self.set_engagement(value.clone());
        self.current_engagement.publish(value);
    }

    /// Number of `unsubscribe` calls received for `signal`, duplicates included.
    pub fn unsubscribe_count(&self, signal: SignalKind) -> usize {
        self.unsubscribe_calls
            .lock()
            .unwrap()
            .get(&signal)
            .copied()
            .unwrap_or(0)
    }

    /// Live registrations on `signal`.
    pub fn subscriber_count(&self, signal: SignalKind) -> usize {
        match signal {
            SignalKind::PendingStatus => self.pending_status.subscriber_count(),
            SignalKind::UnreadCount => self.unread_count.subscriber_count(),
            SignalKind::EngagementState => self.engagement_state.subscriber_count(),
            SignalKind::EngagementPresence => self.current_engagement.subscriber_count(),
        }
    }

    fn is_refused(&self, signal: SignalKind) -> bool {
        self.refused.lock().unwrap().contains(&signal)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueDirectory for MockBackend {
    async fn fetch_queues(&self, ids: &[QueueId]) -> Result<Vec<Queue>, SecureChatError> {
        self.queue_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.queue_error.lock().unwrap().clone() {
            return Err(SecureChatError::transport(message));
        }
        Ok(self
            .queues
            .lock()
            .unwrap()
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn list_queues(&self) -> Result<Vec<Queue>, SecureChatError> {
        self.queue_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.queue_error.lock().unwrap().clone() {
            return Err(SecureChatError::transport(message));
        }
        Ok(self.queues.lock().unwrap().clone())
    }
}

impl VisitorSession for MockBackend {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn current_engagement(&self) -> Option<Engagement> {
        self.engagement.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptSource for MockBackend {
    async fn fetch_chat_history(&self) -> Result<Vec<ChatMessage>, SecureChatError> {
        let reply = self.history.lock().unwrap().clone();
        reply.resolve().await
    }

    async fn unread_message_count(&self) -> Result<u32, SecureChatError> {
        let reply = self.unread.lock().unwrap().clone();
        let result = reply.resolve().await;
        self.unread_completed.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn mark_messages_read(&self) -> Result<(), SecureChatError> {
        self.mark_read_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.mark_read.lock().unwrap().clone();
        reply.resolve().await
    }
}

impl InteractionSignals for MockBackend {
    fn observe_pending_status(&self, callback: SignalCallback<bool>) -> Option<SubscriptionToken> {
        (!self.is_refused(SignalKind::PendingStatus))
            .then(|| self.pending_status.subscribe(callback))
    }

    fn observe_unread_count(&self, callback: SignalCallback<u32>) -> Option<SubscriptionToken> {
        (!self.is_refused(SignalKind::UnreadCount)).then(|| self.unread_count.subscribe(callback))
    }

    fn observe_engagement_state(
        &self,
        callback: SignalCallback<InteractorState>,
    ) -> Option<SubscriptionToken> {
        (!self.is_refused(SignalKind::EngagementState))
            .then(|| self.engagement_state.subscribe(callback))
    }

    fn observe_current_engagement(
        &self,
        callback: SignalCallback<Option<Engagement>>,
    ) -> Option<SubscriptionToken> {
        (!self.is_refused(SignalKind::EngagementPresence))
            .then(|| self.current_engagement.subscribe(callback))
    }

    fn unsubscribe(&self, token: SubscriptionToken) {
        *self
            .unsubscribe_calls
            .lock()
            .unwrap()
            .entry(token.signal())
            .or_insert(0) += 1;

        match token.signal() {
            SignalKind::PendingStatus => self.pending_status.unsubscribe(&token),
            SignalKind::UnreadCount => self.unread_count.unsubscribe(&token),
            SignalKind::EngagementState => self.engagement_state.unsubscribe(&token),
            SignalKind::EngagementPresence => self.current_engagement.unsubscribe(&token),
        };
    }
}
