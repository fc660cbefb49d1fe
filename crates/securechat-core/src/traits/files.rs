// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File upload and download transport.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SecureChatError;
use crate::types::{Attachment, FileSource, LocalFile};

/// Receives transfer progress as a fraction in `0.0..=1.0`.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Moves file bytes between the device and the backend.
#[async_trait]
pub trait FileTransport: Send + Sync + 'static {
    /// Uploads `file`, reporting progress as bytes are sent.
    ///
    /// Upload failures are reported as [`SecureChatError::Upload`] carrying the
    /// failure kind; any other error variant is treated as a network failure.
    async fn upload_file(
        &self,
        file: &FileSource,
        progress: ProgressCallback,
    ) -> Result<Attachment, SecureChatError>;

    /// Downloads `file` to local storage, reporting progress as bytes arrive.
    async fn download_file(
        &self,
        file: &Attachment,
        progress: ProgressCallback,
    ) -> Result<LocalFile, SecureChatError>;
}
