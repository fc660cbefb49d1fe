// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription registry for push-style signal sources.
//!
//! A [`SignalHub`] owns the callbacks registered against one signal and hands
//! out an opaque [`SubscriptionToken`] per registration. Unsubscribing is
//! idempotent and may happen from any thread, including from inside a
//! callback that is currently being delivered.

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::SignalKind;

/// Callback invoked with every value published on a signal.
pub type SignalCallback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Opaque cancellation handle returned by a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    id: Uuid,
    signal: SignalKind,
}

impl SubscriptionToken {
    /// Mint a fresh token for `signal`.
    pub fn new(signal: SignalKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            signal,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The signal this token was issued for.
    pub fn signal(&self) -> SignalKind {
        self.signal
    }
}

/// A multi-subscriber push source for values of type `T`.
///
/// The hub remembers the most recently published value and replays it to new
/// subscribers, so a subscriber always starts from the current state.
///
/// Deliveries are serialized: a replay never interleaves with a publish, and
/// every subscriber sees published values in the same order. A callback must
/// not publish on or subscribe to the hub that is delivering to it.
pub struct SignalHub<T> {
    signal: SignalKind,
    subscribers: DashMap<Uuid, SignalCallback<T>>,
    latest: Mutex<Option<T>>,
    delivery: Mutex<()>,
}

impl<T: Clone + Send + 'static> SignalHub<T> {
    /// Create an empty hub for `signal` with nothing to replay.
    pub fn new(signal: SignalKind) -> Self {
        Self {
            signal,
            subscribers: DashMap::new(),
            latest: Mutex::new(None),
            delivery: Mutex::new(()),
        }
    }

    /// Create a hub that replays `initial` until something else is published.
    pub fn with_initial(signal: SignalKind, initial: T) -> Self {
        let hub = Self::new(signal);
        hub.store_latest(initial);
        hub
    }

    pub fn signal(&self) -> SignalKind {
        self.signal
    }

    /// Register `callback` and return its token.
    ///
    /// If a value has already been published, `callback` receives it before
    /// this method returns.
    pub fn subscribe(&self, callback: SignalCallback<T>) -> SubscriptionToken {
        let token = SubscriptionToken::new(self.signal);
        let _delivery = self.deliver_exclusively();
        self.subscribers.insert(token.id, Arc::clone(&callback));
        debug!(signal = %self.signal, token = %token.id, "subscriber registered");

        if let Some(current) = self.latest() {
            callback(current);
        }
        token
    }

    /// Remove the registration behind `token`.
    ///
    /// Returns `false` when the token is unknown or was already removed; that
    /// case is a no-op.
    pub fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        if token.signal != self.signal {
            return false;
        }
        let removed = self.subscribers.remove(&token.id).is_some();
        if removed {
            debug!(signal = %self.signal, token = %token.id, "subscriber removed");
        }
        removed
    }

    /// Deliver `value` to every live subscriber.
    pub fn publish(&self, value: T) {
        let _delivery = self.deliver_exclusively();
        self.store_latest(value.clone());

        // Snapshot the callbacks first so a callback may unsubscribe without
        // contending with the map shard we are iterating.
        let callbacks: Vec<SignalCallback<T>> = self
            .subscribers
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for callback in callbacks {
            callback(value.clone());
        }
    }

    /// The most recently published value, if any.
    pub fn latest(&self) -> Option<T> {
        match self.latest.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_subscribed(&self, token: &SubscriptionToken) -> bool {
        token.signal == self.signal && self.subscribers.contains_key(&token.id)
    }

    fn deliver_exclusively(&self) -> MutexGuard<'_, ()> {
        match self.delivery.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn store_latest(&self, value: T) {
        match self.latest.lock() {
            Ok(mut guard) => *guard = Some(value),
            Err(poisoned) => *poisoned.into_inner() = Some(value),
        }
    }
}
