// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue metadata lookup.

use async_trait::async_trait;

use crate::error::SecureChatError;
use crate::types::{Queue, QueueId};

/// Read-only view of the backend's queue directory.
#[async_trait]
pub trait QueueDirectory: Send + Sync + 'static {
    /// Fetches metadata for the given queues in a single batched call.
    ///
    /// Unknown ids are simply absent from the result.
    async fn fetch_queues(&self, ids: &[QueueId]) -> Result<Vec<Queue>, SecureChatError>;

    /// Fetches every queue visible to the site, including default queues.
    async fn list_queues(&self) -> Result<Vec<Queue>, SecureChatError>;
}
