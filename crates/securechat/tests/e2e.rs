// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests composing the synchronization and transfer components
//! over the mock backend, configured the way the binary configures them.

use std::sync::Arc;
use std::time::Duration;

use securechat_core::{Author, ChatItem, SignalKind};
use securechat_sync::{
    AvailabilityResolver, AvailabilityStatus, MarkReadScheduler, PendingInteraction,
    TranscriptSynchronizer, transcript_items,
};
use securechat_test_utils::{MockBackend, MockFileTransport, Reply, fixtures};
use securechat_transfer::{FileUploader, UploadState};

#[tokio::test(start_paused = true)]
async fn opening_the_transcript_clears_the_badge() {
    let config = securechat_config::load_and_validate_str("").unwrap();
    let backend = Arc::new(MockBackend::new().with_queues(vec![fixtures::messaging_queue(1)]));
    backend.reply_history(Reply::ok(fixtures::transcript(&[
        Author::Operator,
        Author::Visitor,
        Author::Operator,
    ])));
    backend.reply_unread(Reply::ok(1));
    backend.publish_unread_count(1);

    let resolver =
        AvailabilityResolver::from_config(backend.clone(), backend.clone(), &config.availability)
            .unwrap();
    let status = resolver.resolve(&[fixtures::queue_id(1)]).await.unwrap();
    assert!(status.is_available());

    let pending = PendingInteraction::new(backend.clone()).unwrap();
    assert!(pending.has_pending_interaction());

    let synchronizer = TranscriptSynchronizer::from_config(backend.clone(), &config.sync);
    let bundle = synchronizer.load_messages_with_unread_count().await.unwrap();
    let items = transcript_items(&bundle);
    assert_eq!(items[2], ChatItem::UnreadMessageDivider);

    let handle = MarkReadScheduler::from_config(backend.clone(), &config.sync).schedule();
    assert!(handle.wait().await);
    assert_eq!(backend.mark_read_count(), 1);

    // The backend confirms the read by pushing a zero count.
    backend.publish_unread_count(0);
    assert!(!pending.has_pending_interaction());

    drop(pending);
    assert_eq!(backend.unsubscribe_count(SignalKind::UnreadCount), 1);
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_bounds_the_transcript_load() {
    let config =
        securechat_config::load_and_validate_str("[sync]\nunread_count_timeout_ms = 500\n")
            .unwrap();
    let backend = Arc::new(MockBackend::new());
    backend.reply_unread(Reply::Never);

    let start = tokio::time::Instant::now();
    let bundle = TranscriptSynchronizer::from_config(backend.clone(), &config.sync)
        .load_messages_with_unread_count()
        .await
        .unwrap();

    assert_eq!(bundle.unread_count, 0);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn unauthenticated_visitor_never_reaches_the_directory() {
    let config = securechat_config::load_and_validate_str("").unwrap();
    let backend = Arc::new(MockBackend::new());
    backend.set_authenticated(false);

    let resolver =
        AvailabilityResolver::from_config(backend.clone(), backend.clone(), &config.availability)
            .unwrap();

    assert!(matches!(
        resolver.resolve(&[]).await.unwrap(),
        AvailabilityStatus::Unavailable(_)
    ));
    assert_eq!(backend.queue_fetch_count(), 0);
}

#[tokio::test]
async fn configured_upload_limit_gates_the_picker() {
    let config = securechat_config::load_and_validate_str("[transfer]\nmax_uploads = 2\n").unwrap();
    let transport = Arc::new(MockFileTransport::new());
    let uploader = FileUploader::from_config(transport.clone(), &config.transfer);
    let mut snapshots = uploader.subscribe();

    let first = uploader.add_upload(fixtures::file_source("id.png", 10)).unwrap();
    let _second = uploader.add_upload(fixtures::file_source("bill.pdf", 10)).unwrap();
    snapshots
        .wait_for(|s| s.uploads.iter().all(|u| matches!(u.state, UploadState::Uploaded(_))))
        .await
        .unwrap();

    assert!(snapshots.borrow().limit_reached);
    assert!(uploader.add_upload(fixtures::file_source("extra.png", 10)).is_none());

    uploader.remove_upload(&first);
    assert!(!snapshots.borrow().limit_reached);
    assert_eq!(uploader.attachments().len(), 1);
}
