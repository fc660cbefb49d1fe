// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer registry for per-transfer state changes.
//!
//! Observers are keyed by an [`ObserverToken`] and removed explicitly. The
//! registry never keeps the observed transfer alive.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

/// Callback invoked with each new state.
pub type StateObserver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identity of one registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(Uuid);

pub struct ProgressObservers<T> {
    observers: DashMap<ObserverToken, StateObserver<T>>,
}

impl<T> ProgressObservers<T> {
    pub fn new() -> Self {
        Self {
            observers: DashMap::new(),
        }
    }

    pub fn add(&self, observer: StateObserver<T>) -> ObserverToken {
        let token = ObserverToken(Uuid::new_v4());
        self.observers.insert(token, observer);
        token
    }

    /// Returns `false` if the token was already removed.
    pub fn remove(&self, token: &ObserverToken) -> bool {
        self.observers.remove(token).is_some()
    }

    pub fn notify(&self, state: &T) {
        // Collect first so an observer may remove itself.
        let observers: Vec<StateObserver<T>> = self
            .observers
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for observer in observers {
            observer(state);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<T> Default for ProgressObservers<T> {
    fn default() -> Self {
        Self::new()
    }
}
