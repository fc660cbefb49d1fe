// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload coordination.
//!
//! [`FileUploader`] owns the upload list. Each [`FileUpload`] moves
//! `None -> Uploading -> Uploaded | Error` and never leaves a terminal state;
//! a failed file is retried by removing it and adding it again.
//!
//! The uploader enforces a cap on uploads that are in flight or succeeded and
//! publishes a [`UploaderSnapshot`] whose `limit_reached` flag flips as soon
//! as that count crosses the cap in either direction.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use securechat_config::TransferConfig;
use securechat_core::{Attachment, FileSource, FileTransport, SecureChatError, UploadErrorKind};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::id_collection::IdCollection;
use crate::progress::{ObserverToken, ProgressObservers, StateObserver};

/// State of one upload.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    None,
    Uploading { progress: f64 },
    Uploaded(Attachment),
    Error(UploadErrorKind),
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Uploaded(_) | UploadState::Error(_))
    }

    /// Not yet finished, successfully or not.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// One file in the upload list.
pub struct FileUpload {
    id: Uuid,
    source: FileSource,
    state: watch::Sender<UploadState>,
    observers: ProgressObservers<UploadState>,
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("id", &self.id)
            .field("name", &self.source.name)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl FileUpload {
    fn new(source: FileSource) -> Self {
        let (state, _) = watch::channel(UploadState::None);
        Self {
            id: Uuid::new_v4(),
            source,
            state,
            observers: ProgressObservers::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn attachment(&self) -> Option<Attachment> {
        match &*self.state.borrow() {
            UploadState::Uploaded(attachment) => Some(attachment.clone()),
            _ => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Register a callback for every state change, progress included.
    pub fn observe(&self, observer: StateObserver<UploadState>) -> ObserverToken {
        self.observers.add(observer)
    }

    pub fn remove_observer(&self, token: &ObserverToken) -> bool {
        self.observers.remove(token)
    }

    fn begin(&self) -> bool {
        self.transition(|state| match state {
            UploadState::None => Some(UploadState::Uploading { progress: 0.0 }),
            _ => None,
        })
    }

    /// Progress only moves forward and only while uploading.
    fn report_progress(&self, progress: f64) -> bool {
        let progress = progress.clamp(0.0, 1.0);
        self.transition(|state| match state {
            UploadState::Uploading { progress: current } if progress > *current => {
                Some(UploadState::Uploading { progress })
            }
            _ => None,
        })
    }

    fn finish(&self, result: Result<Attachment, UploadErrorKind>) -> bool {
        self.transition(|state| {
            if state.is_terminal() {
                return None;
            }
            Some(match result {
                Ok(attachment) => UploadState::Uploaded(attachment),
                Err(kind) => UploadState::Error(kind),
            })
        })
    }

    fn transition(&self, next: impl FnOnce(&UploadState) -> Option<UploadState>) -> bool {
        let mut changed = None;
        self.state.send_if_modified(|state| match next(state) {
            Some(new_state) => {
                *state = new_state.clone();
                changed = Some(new_state);
                true
            }
            None => false,
        });
        match changed {
            Some(state) => {
                self.observers.notify(&state);
                true
            }
            None => false,
        }
    }
}

/// One row of the aggregate upload list.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadView {
    pub id: Uuid,
    pub name: String,
    pub state: UploadState,
}

/// Aggregate upload list state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploaderSnapshot {
    pub uploads: Vec<UploadView>,
    pub limit_reached: bool,
}

struct UploadEntry {
    upload: Arc<FileUpload>,
    observer: ObserverToken,
    task: Option<AbortHandle>,
}

impl UploadEntry {
    /// Stop the transfer task and settle the handle as cancelled.
    fn retire(self) {
        if let Some(task) = self.task {
            task.abort();
        }
        self.upload.finish(Err(UploadErrorKind::Cancelled));
    }
}

struct UploaderInner {
    transport: Arc<dyn FileTransport>,
    max_uploads: usize,
    max_file_size: u64,
    uploads: Mutex<IdCollection<Uuid, UploadEntry>>,
    snapshot: watch::Sender<UploaderSnapshot>,
}

impl UploaderInner {
    fn lock(&self) -> MutexGuard<'_, IdCollection<Uuid, UploadEntry>> {
        match self.uploads.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn counted(uploads: &IdCollection<Uuid, UploadEntry>) -> usize {
        uploads
            .values()
            .filter(|entry| !matches!(entry.upload.state(), UploadState::Error(_)))
            .count()
    }

    /// Rebuild the snapshot and send it before releasing the list lock, so
    /// concurrent publishers cannot overwrite a newer snapshot with an older one.
    fn publish(&self) {
        let uploads = self.lock();
        let next = UploaderSnapshot {
            uploads: uploads
                .values()
                .map(|entry| UploadView {
                    id: entry.upload.id(),
                    name: entry.upload.source().name.clone(),
                    state: entry.upload.state(),
                })
                .collect(),
            limit_reached: Self::counted(&uploads) >= self.max_uploads,
        };
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            if current.limit_reached != next.limit_reached {
                debug!(limit_reached = next.limit_reached, "upload limit changed");
            }
            *current = next;
            true
        });
    }
}

/// Coordinates the visitor's pending uploads.
pub struct FileUploader {
    inner: Arc<UploaderInner>,
}

impl FileUploader {
    pub fn new(transport: Arc<dyn FileTransport>, max_uploads: usize, max_file_size: u64) -> Self {
        let (snapshot, _) = watch::channel(UploaderSnapshot::default());
        Self {
            inner: Arc::new(UploaderInner {
                transport,
                max_uploads,
                max_file_size,
                uploads: Mutex::new(IdCollection::new()),
                snapshot,
            }),
        }
    }

    pub fn from_config(transport: Arc<dyn FileTransport>, config: &TransferConfig) -> Self {
        Self::new(transport, config.max_uploads, config.max_file_size_bytes)
    }

    /// Queue `source` for upload.
    ///
    /// Returns `None` when the limit is reached. Files over the size limit
    /// are accepted into the list but fail immediately with
    /// [`UploadErrorKind::FileTooBig`]. Must be called inside a Tokio runtime.
    pub fn add_upload(&self, source: FileSource) -> Option<Arc<FileUpload>> {
        let oversized = source.size > self.inner.max_file_size;
        let upload = Arc::new(FileUpload::new(source));

        {
            let mut uploads = self.inner.lock();
            if UploaderInner::counted(&uploads) >= self.inner.max_uploads {
                debug!(max = self.inner.max_uploads, "upload rejected: limit reached");
                return None;
            }

            if oversized {
                warn!(
                    file = %upload.source().name,
                    size = upload.source().size,
                    max = self.inner.max_file_size,
                    "upload rejected: file too big"
                );
                upload.finish(Err(UploadErrorKind::FileTooBig));
            }

            let observer = upload.observe(self.snapshot_observer());
            let task = (!oversized).then(|| self.spawn_upload(Arc::clone(&upload)));
            uploads.insert(
                upload.id(),
                UploadEntry {
                    upload: Arc::clone(&upload),
                    observer,
                    task,
                },
            );
        }

        debug!(upload_id = %upload.id(), file = %upload.source().name, "upload added");
        self.inner.publish();
        Some(upload)
    }

    /// Drop `upload` from the list.
    ///
    /// An upload still in flight is cancelled and its handle settles in
    /// `Error(Cancelled)`; finished uploads keep their state.
    pub fn remove_upload(&self, upload: &FileUpload) -> bool {
        let removed = self.inner.lock().remove(&upload.id());
        let Some(entry) = removed else {
            return false;
        };

        entry.upload.remove_observer(&entry.observer);
        entry.retire();
        debug!(upload_id = %upload.id(), "upload removed");
        self.inner.publish();
        true
    }

    /// Drop every upload, cancelling those in flight.
    pub fn remove_all(&self) {
        let entries: Vec<UploadEntry> = {
            let mut uploads = self.inner.lock();
            let keys = uploads.keys().to_vec();
            keys.iter().filter_map(|key| uploads.remove(key)).collect()
        };
        for entry in entries {
            entry.upload.remove_observer(&entry.observer);
            entry.retire();
        }
        self.inner.publish();
    }

    pub fn uploads(&self) -> Vec<Arc<FileUpload>> {
        self.collect(|_| true)
    }

    pub fn succeeded_uploads(&self) -> Vec<Arc<FileUpload>> {
        self.collect(|state| matches!(state, UploadState::Uploaded(_)))
    }

    pub fn failed_uploads(&self) -> Vec<Arc<FileUpload>> {
        self.collect(|state| matches!(state, UploadState::Error(_)))
    }

    pub fn active_uploads(&self) -> Vec<Arc<FileUpload>> {
        self.collect(UploadState::is_active)
    }

    /// Attachments of every succeeded upload, in list order.
    pub fn attachments(&self) -> Vec<Attachment> {
        self.inner
            .lock()
            .values()
            .filter_map(|entry| entry.upload.attachment())
            .collect()
    }

    pub fn limit_reached(&self) -> bool {
        UploaderInner::counted(&self.inner.lock()) >= self.inner.max_uploads
    }

    pub fn snapshot(&self) -> UploaderSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploaderSnapshot> {
        self.inner.snapshot.subscribe()
    }

    fn collect(&self, keep: impl Fn(&UploadState) -> bool) -> Vec<Arc<FileUpload>> {
        self.inner
            .lock()
            .values()
            .filter(|entry| keep(&entry.upload.state()))
            .map(|entry| Arc::clone(&entry.upload))
            .collect()
    }

    fn snapshot_observer(&self) -> StateObserver<UploadState> {
        let inner: Weak<UploaderInner> = Arc::downgrade(&self.inner);
        Arc::new(move |_| {
            if let Some(inner) = inner.upgrade() {
                inner.publish();
            }
        })
    }

    fn spawn_upload(&self, upload: Arc<FileUpload>) -> AbortHandle {
        let transport = Arc::clone(&self.inner.transport);
        let handle = tokio::spawn(async move {
            upload.begin();

            let target = Arc::downgrade(&upload);
            let progress = Arc::new(move |value: f64| {
                if let Some(upload) = target.upgrade() {
                    upload.report_progress(value);
                }
            });

            let result = transport
                .upload_file(upload.source(), progress)
                .await
                .map_err(|e| {
                    warn!(upload_id = %upload.id(), error = %e, "upload failed");
                    upload_error_kind(&e)
                });
            if let Ok(attachment) = &result {
                debug!(upload_id = %upload.id(), attachment_id = %attachment.id, "upload finished");
            }
            upload.finish(result);
        });
        handle.abort_handle()
    }
}

impl Drop for FileUploader {
    fn drop(&mut self) {
        for entry in self.inner.lock().values() {
            if let Some(task) = &entry.task {
                task.abort();
            }
        }
    }
}

fn upload_error_kind(error: &SecureChatError) -> UploadErrorKind {
    match error {
        SecureChatError::Upload { kind } => *kind,
        SecureChatError::Transport { .. } | SecureChatError::Timeout { .. } => {
            UploadErrorKind::Network
        }
        _ => UploadErrorKind::Generic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(size: u64) -> FileSource {
        FileSource {
            path: PathBuf::from("/tmp/report.pdf"),
            name: "report.pdf".into(),
            content_type: "application/pdf".into(),
            size,
        }
    }

    fn attachment() -> Attachment {
        Attachment {
            id: "att-1".into(),
            name: "report.pdf".into(),
            content_type: "application/pdf".into(),
            size: 10,
        }
    }

    #[test]
    fn terminal_state_is_never_left() {
        let upload = FileUpload::new(source(10));
        assert!(upload.begin());
        assert!(upload.finish(Err(UploadErrorKind::Network)));

        assert!(!upload.finish(Ok(attachment())));
        assert!(!upload.report_progress(0.9));
        assert!(!upload.begin());
        assert_eq!(upload.state(), UploadState::Error(UploadErrorKind::Network));
    }

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let upload = FileUpload::new(source(10));
        assert!(!upload.report_progress(0.3));
        upload.begin();

        assert!(upload.report_progress(0.5));
        assert!(!upload.report_progress(0.4));
        assert!(upload.report_progress(7.0));
        assert_eq!(upload.state(), UploadState::Uploading { progress: 1.0 });
    }

    #[test]
    fn observers_see_every_transition() {
        let upload = FileUpload::new(source(10));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        upload.observe(Arc::new(move |state| sink.lock().unwrap().push(state.clone())));

        upload.begin();
        upload.report_progress(0.5);
        upload.finish(Ok(attachment()));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], UploadState::Uploaded(attachment()));
    }

    #[test]
    fn error_kinds_map_from_transport_errors() {
        assert_eq!(
            upload_error_kind(&SecureChatError::transport("reset")),
            UploadErrorKind::Network
        );
        assert_eq!(
            upload_error_kind(&SecureChatError::Upload {
                kind: UploadErrorKind::UnsupportedFileType
            }),
            UploadErrorKind::UnsupportedFileType
        );
        assert_eq!(
            upload_error_kind(&SecureChatError::Internal("boom".into())),
            UploadErrorKind::Generic
        );
    }
}
