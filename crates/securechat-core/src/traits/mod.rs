// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator contracts consumed by the synchronization core.
//!
//! The engagement backend client implements these traits; the core only ever
//! talks to the backend through them. Async methods use `#[async_trait]` for
//! dynamic dispatch compatibility.

pub mod files;
pub mod queues;
pub mod session;
pub mod signals;
pub mod transcript;

pub use files::{FileTransport, ProgressCallback};
pub use queues::QueueDirectory;
pub use session::VisitorSession;
pub use signals::InteractionSignals;
pub use transcript::TranscriptSource;
