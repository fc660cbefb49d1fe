// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for common test data.

use std::path::PathBuf;

use securechat_core::{
    Attachment, Author, ChatMessage, Engagement, EngagementKind, FileSource, MediaType, Queue,
    QueueId, QueueStatus,
};

/// A well-formed queue id. Equal seeds give equal ids.
pub fn queue_id(seed: u8) -> QueueId {
    QueueId(format!("00000000-0000-4000-8000-0000000000{seed:02x}"))
}

/// An open queue serving messaging and text.
pub fn messaging_queue(seed: u8) -> Queue {
    queue(seed, QueueStatus::Open, &[MediaType::Messaging, MediaType::Text])
}

pub fn queue(seed: u8, status: QueueStatus, media: &[MediaType]) -> Queue {
    Queue {
        id: queue_id(seed),
        name: format!("queue-{seed}"),
        status,
        supported_media: media.iter().copied().collect(),
        is_default: false,
    }
}

pub fn chat_engagement() -> Engagement {
    Engagement {
        id: "engagement-1".to_string(),
        kind: EngagementKind::Chat,
        is_transferred_secure_conversation: false,
    }
}

pub fn transferred_engagement() -> Engagement {
    Engagement {
        id: "engagement-2".to_string(),
        kind: EngagementKind::Chat,
        is_transferred_secure_conversation: true,
    }
}

/// Text messages with the given authors, ids `m0`, `m1`, ...
pub fn transcript(authors: &[Author]) -> Vec<ChatMessage> {
    authors
        .iter()
        .enumerate()
        .map(|(i, author)| ChatMessage::text(format!("m{i}"), *author, format!("message {i}")))
        .collect()
}

pub fn file_source(name: &str, size: u64) -> FileSource {
    FileSource {
        path: PathBuf::from("/tmp").join(name),
        name: name.to_string(),
        content_type: "application/octet-stream".to_string(),
        size,
    }
}

pub fn attachment(id: &str) -> Attachment {
    Attachment {
        id: id.to_string(),
        name: format!("{id}.pdf"),
        content_type: "application/pdf".to_string(),
        size: 1024,
    }
}
