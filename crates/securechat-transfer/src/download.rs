// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Download coordination for attachments referenced by transcript messages.
//!
//! There is one [`FileDownload`] per attachment id. Starting a download moves
//! it to `Downloading` right away; the transfer itself waits for one of a
//! bounded number of permits. A failed download stays failed until the
//! visitor starts it again.

use std::sync::Arc;

use dashmap::DashMap;
use securechat_config::TransferConfig;
use securechat_core::{Attachment, FileTransport, LocalFile};
use tokio::sync::{Semaphore, watch};
use tracing::{debug, warn};

use crate::progress::{ObserverToken, ProgressObservers, StateObserver};

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadState {
    None,
    Downloading { progress: f64 },
    Downloaded(LocalFile),
    Error(String),
}

/// Download state for a single attachment.
pub struct FileDownload {
    attachment: Attachment,
    state: watch::Sender<DownloadState>,
    observers: ProgressObservers<DownloadState>,
}

impl FileDownload {
    fn new(attachment: Attachment) -> Self {
        let (state, _) = watch::channel(DownloadState::None);
        Self {
            attachment,
            state,
            observers: ProgressObservers::new(),
        }
    }

    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    pub fn state(&self) -> DownloadState {
        self.state.borrow().clone()
    }

    pub fn local_file(&self) -> Option<LocalFile> {
        match &*self.state.borrow() {
            DownloadState::Downloaded(file) => Some(file.clone()),
            _ => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DownloadState> {
        self.state.subscribe()
    }

    pub fn observe(&self, observer: StateObserver<DownloadState>) -> ObserverToken {
        self.observers.add(observer)
    }

    pub fn remove_observer(&self, token: &ObserverToken) -> bool {
        self.observers.remove(token)
    }

    /// `None` and `Error` may (re)start; anything else is already under way or done.
    fn begin(&self) -> bool {
        self.transition(|state| match state {
            DownloadState::None | DownloadState::Error(_) => {
                Some(DownloadState::Downloading { progress: 0.0 })
            }
            _ => None,
        })
    }

    fn report_progress(&self, progress: f64) -> bool {
        let progress = progress.clamp(0.0, 1.0);
        self.transition(|state| match state {
            DownloadState::Downloading { progress: current } if progress > *current => {
                Some(DownloadState::Downloading { progress })
            }
            _ => None,
        })
    }

    fn finish(&self, result: Result<LocalFile, String>) -> bool {
        self.transition(|state| match state {
            DownloadState::Downloading { .. } => Some(match result {
                Ok(file) => DownloadState::Downloaded(file),
                Err(message) => DownloadState::Error(message),
            }),
            _ => None,
        })
    }

    fn transition(&self, next: impl FnOnce(&DownloadState) -> Option<DownloadState>) -> bool {
        let mut changed = None;
        self.state.send_if_modified(|state| match next(state) {
            Some(new_state) => {
                *state = new_state.clone();
                changed = Some(new_state);
                true
            }
            None => false,
        });
        if let Some(state) = &changed {
            self.observers.notify(state);
        }
        changed.is_some()
    }
}

/// Hands out one [`FileDownload`] per attachment and runs the transfers.
pub struct FileDownloader {
    transport: Arc<dyn FileTransport>,
    permits: Arc<Semaphore>,
    downloads: DashMap<String, Arc<FileDownload>>,
}

impl FileDownloader {
    pub fn new(transport: Arc<dyn FileTransport>, max_concurrent: usize) -> Self {
        Self {
            transport,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            downloads: DashMap::new(),
        }
    }

    pub fn from_config(transport: Arc<dyn FileTransport>, config: &TransferConfig) -> Self {
        Self::new(transport, config.max_concurrent_downloads)
    }

    /// The download for `attachment`, created in `None` state on first use.
    pub fn download_for(&self, attachment: &Attachment) -> Arc<FileDownload> {
        let entry = self
            .downloads
            .entry(attachment.id.clone())
            .or_insert_with(|| Arc::new(FileDownload::new(attachment.clone())));
        Arc::clone(entry.value())
    }

    /// Look up a download without creating one.
    pub fn get(&self, attachment_id: &str) -> Option<Arc<FileDownload>> {
        self.downloads
            .get(attachment_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Fetch `attachment`, starting the transfer if it is not already running or done.
    pub fn download(&self, attachment: &Attachment) -> Arc<FileDownload> {
        let download = self.download_for(attachment);
        self.start(&download);
        download
    }

    /// Start or retry `download`. Returns `false` if it was already
    /// downloading or downloaded. Must be called inside a Tokio runtime.
    pub fn start(&self, download: &Arc<FileDownload>) -> bool {
        let retry = matches!(download.state(), DownloadState::Error(_));
        if !download.begin() {
            return false;
        }
        debug!(attachment_id = %download.attachment().id, retry, "download started");

        let download = Arc::clone(download);
        let transport = Arc::clone(&self.transport);
        let permits = Arc::clone(&self.permits);
        tokio::spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => {
                    let target = Arc::downgrade(&download);
                    let progress = Arc::new(move |value: f64| {
                        if let Some(download) = target.upgrade() {
                            download.report_progress(value);
                        }
                    });
                    transport
                        .download_file(download.attachment(), progress)
                        .await
                        .map_err(|e| e.to_string())
                }
                Err(_) => Err("download queue closed".to_string()),
            };

            let attachment_id = &download.attachment().id;
            match &result {
                Ok(file) => debug!(%attachment_id, path = %file.path.display(), "download finished"),
                Err(message) => warn!(%attachment_id, error = %message, "download failed"),
            }
            download.finish(result);
        });
        true
    }

    pub fn len(&self) -> usize {
        self.downloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn attachment() -> Attachment {
        Attachment {
            id: "att-1".into(),
            name: "scan.pdf".into(),
            content_type: "application/pdf".into(),
            size: 10,
        }
    }

    fn local_file() -> LocalFile {
        LocalFile {
            path: PathBuf::from("/tmp/scan.pdf"),
            name: "scan.pdf".into(),
            size: 10,
        }
    }

    #[test]
    fn error_state_can_restart() {
        let download = FileDownload::new(attachment());
        assert!(download.begin());
        assert!(!download.begin());
        assert!(download.finish(Err("timeout".into())));

        assert!(download.begin());
        assert!(download.finish(Ok(local_file())));
        assert!(!download.begin());
        assert_eq!(download.local_file(), Some(local_file()));
    }

    #[test]
    fn finish_requires_downloading() {
        let download = FileDownload::new(attachment());
        assert!(!download.finish(Ok(local_file())));
        assert_eq!(download.state(), DownloadState::None);
    }
}
