// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the SecureChat synchronization core.
//!
//! This crate provides the error type, the shared data model, the collaborator
//! traits implemented by the engagement backend client, and the generic
//! subscription registry used to express push-style signals.

pub mod error;
pub mod subscription;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{SecureChatError, SignalKind, UploadErrorKind};
pub use subscription::{SignalCallback, SignalHub, SubscriptionToken};
pub use types::{
    Attachment, Author, ChatItem, ChatMessage, ChoiceOption, Engagement, EngagementKind,
    FileSource, InteractorState, LocalFile, MediaType, MessageId, MessageKind, Queue, QueueId,
    QueueStatus,
};

pub use traits::{
    FileTransport, InteractionSignals, ProgressCallback, QueueDirectory, TranscriptSource,
    VisitorSession,
};
