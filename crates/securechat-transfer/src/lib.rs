// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File transfer coordination for secure conversations.
//!
//! The uploader and downloader are the only owners of their lists; callers
//! observe them through `watch` receivers or registered state observers.

pub mod download;
pub mod id_collection;
pub mod progress;
pub mod upload;

pub use download::{DownloadState, FileDownload, FileDownloader};
pub use id_collection::{IdCollection, KeyedDiff, keyed_diff};
pub use progress::{ObserverToken, ProgressObservers, StateObserver};
pub use upload::{FileUpload, FileUploader, UploadState, UploadView, UploaderSnapshot};
