// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock file transport for deterministic transfer tests.
//!
//! Outcomes are scripted per file: uploads by file name, downloads by
//! attachment id. A gated transport holds every transfer until the test
//! releases it, which keeps uploads "in flight" for as long as needed.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use securechat_core::{
    Attachment, FileSource, FileTransport, LocalFile, ProgressCallback, SecureChatError,
    UploadErrorKind,
};

const PROGRESS_STEPS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// A scriptable in-memory [`FileTransport`].
pub struct MockFileTransport {
    gate: Option<Arc<Semaphore>>,
    upload_failures: Mutex<HashMap<String, VecDeque<UploadErrorKind>>>,
    download_failures: Mutex<HashMap<String, VecDeque<String>>>,
    uploads_started: AtomicUsize,
    downloads_started: AtomicUsize,
    active_downloads: AtomicUsize,
    peak_downloads: AtomicUsize,
}

impl MockFileTransport {
    /// A transport where every transfer completes as soon as it runs.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A transport where every transfer waits for [`release`](Self::release).
    pub fn gated() -> Self {
        Self::build(Some(Arc::new(Semaphore::new(0))))
    }

    fn build(gate: Option<Arc<Semaphore>>) -> Self {
        Self {
            gate,
            upload_failures: Mutex::new(HashMap::new()),
            download_failures: Mutex::new(HashMap::new()),
            uploads_started: AtomicUsize::new(0),
            downloads_started: AtomicUsize::new(0),
            active_downloads: AtomicUsize::new(0),
            peak_downloads: AtomicUsize::new(0),
        }
    }

    /// Let `count` waiting (or future) transfers proceed.
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// The next upload of a file named `name` fails with `kind`.
    pub fn fail_next_upload(&self, name: &str, kind: UploadErrorKind) {
        self.upload_failures
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(kind);
    }

    /// The next download of attachment `id` fails with `message`.
    pub fn fail_next_download(&self, id: &str, message: &str) {
        self.download_failures
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .push_back(message.to_string());
    }

    pub fn uploads_started(&self) -> usize {
        self.uploads_started.load(Ordering::SeqCst)
    }

    pub fn downloads_started(&self) -> usize {
        self.downloads_started.load(Ordering::SeqCst)
    }

    /// Highest number of downloads observed transferring at once.
    pub fn peak_concurrent_downloads(&self) -> usize {
        self.peak_downloads.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self) {
        let Some(gate) = &self.gate else {
            return;
        };
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }

    async fn report_progress(progress: &ProgressCallback) {
        for step in PROGRESS_STEPS {
            progress(step);
            tokio::task::yield_now().await;
        }
    }
}

impl Default for MockFileTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileTransport for MockFileTransport {
    async fn upload_file(
        &self,
        file: &FileSource,
        progress: ProgressCallback,
    ) -> Result<Attachment, SecureChatError> {
        self.uploads_started.fetch_add(1, Ordering::SeqCst);
        progress(0.0);
        self.pass_gate().await;

        let failure = self
            .upload_failures
            .lock()
            .unwrap()
            .get_mut(&file.name)
            .and_then(VecDeque::pop_front);
        if let Some(kind) = failure {
            return Err(SecureChatError::Upload { kind });
        }

        Self::report_progress(&progress).await;
        Ok(Attachment {
            id: format!("att-{}", uuid::Uuid::new_v4()),
            name: file.name.clone(),
            content_type: file.content_type.clone(),
            size: file.size,
        })
    }

    async fn download_file(
        &self,
        file: &Attachment,
        progress: ProgressCallback,
    ) -> Result<LocalFile, SecureChatError> {
        self.downloads_started.fetch_add(1, Ordering::SeqCst);
        let active = self.active_downloads.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_downloads.fetch_max(active, Ordering::SeqCst);

        self.pass_gate().await;
        let failure = self
            .download_failures
            .lock()
            .unwrap()
            .get_mut(&file.id)
            .and_then(VecDeque::pop_front);

        let result = match failure {
            Some(message) => Err(SecureChatError::Download { message }),
            None => {
                Self::report_progress(&progress).await;
                Ok(LocalFile {
                    path: PathBuf::from("/tmp/securechat-mock").join(&file.name),
                    name: file.name.clone(),
                    size: file.size,
                })
            }
        };

        self.active_downloads.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
