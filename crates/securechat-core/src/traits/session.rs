// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visitor authentication and engagement snapshot.

use crate::types::Engagement;

/// Point-in-time view of the visitor session held by the backend client.
pub trait VisitorSession: Send + Sync + 'static {
    /// Secure messaging requires an authenticated visitor.
    fn is_authenticated(&self) -> bool;

    /// The engagement the visitor is currently in, if any.
    fn current_engagement(&self) -> Option<Engagement>;
}
