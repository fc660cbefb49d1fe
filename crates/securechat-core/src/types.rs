// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the collaborator traits and the synchronization core.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Queues ---

/// Identifier of a routing queue as handed out by the engagement backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueId(pub String);

impl QueueId {
    /// Queue ids are UUIDs; anything else is malformed.
    pub fn is_well_formed(&self) -> bool {
        uuid::Uuid::parse_str(&self.0).is_ok()
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueueId {
    fn from(value: &str) -> Self {
        QueueId(value.to_string())
    }
}

/// Whether a queue currently accepts engagement requests.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Open,
    Closed,
}

/// Media a queue can serve.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Text,
    Audio,
    Video,
    Phone,
    Messaging,
}

/// Snapshot of a queue's metadata, valid for a single availability resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub name: String,
    pub status: QueueStatus,
    pub supported_media: BTreeSet<MediaType>,
    /// Default queues are used when the integrator does not name any.
    #[serde(default)]
    pub is_default: bool,
}

impl Queue {
    /// True if the queue is not closed and serves `media`.
    pub fn accepts(&self, media: MediaType) -> bool {
        self.status != QueueStatus::Closed && self.supported_media.contains(&media)
    }
}

// --- Engagements ---

/// The kind of engagement a visitor can be in or be enqueued for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    Chat,
    Audio,
    Video,
    Messaging,
}

/// The visitor's current engagement, as reported by the backend client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub id: String,
    pub kind: EngagementKind,
    /// Set when a secure conversation was promoted to a live engagement.
    #[serde(default)]
    pub is_transferred_secure_conversation: bool,
}

/// Engagement state machine as observed through the backend client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractorState {
    #[default]
    Idle,
    /// An enqueue request for the given kind is in flight or waiting.
    Enqueueing(EngagementKind),
    Engaged,
    Ended,
}

impl InteractorState {
    pub fn is_enqueueing(&self) -> bool {
        matches!(self, InteractorState::Enqueueing(_))
    }
}

// --- Messages ---

/// Unique identifier for a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

/// Who wrote a message. Only operator messages count toward "unread".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Visitor,
    Operator,
    System,
}

/// One selectable option on a choice card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub text: String,
    pub value: String,
}

/// Discriminated payload of a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    Text {
        content: String,
    },
    ChoiceCard {
        content: String,
        options: Vec<ChoiceOption>,
    },
    CustomCard {
        payload: serde_json::Value,
    },
    Attachments {
        #[serde(default)]
        content: Option<String>,
        files: Vec<Attachment>,
    },
}

/// A transcript message. Transcript order is chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub author: Author,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Convenience constructor for a plain text message stamped "now".
    pub fn text(id: impl Into<String>, author: Author, content: impl Into<String>) -> Self {
        Self {
            id: MessageId(id.into()),
            author,
            kind: MessageKind::Text {
                content: content.into(),
            },
            created_at: Utc::now(),
        }
    }
}

/// A row in a rendered message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum ChatItem {
    Message(ChatMessage),
    /// Marker separating read from unread messages.
    UnreadMessageDivider,
}

impl ChatItem {
    /// Author of the underlying message, `None` for non-message rows.
    pub fn author(&self) -> Option<Author> {
        match self {
            ChatItem::Message(msg) => Some(msg.author),
            ChatItem::UnreadMessageDivider => None,
        }
    }

    pub fn is_operator_message(&self) -> bool {
        self.author() == Some(Author::Operator)
    }
}

impl From<ChatMessage> for ChatItem {
    fn from(msg: ChatMessage) -> Self {
        ChatItem::Message(msg)
    }
}

// --- Files ---

/// A local file the visitor picked for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSource {
    pub path: PathBuf,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

/// A file stored on the backend, either freshly uploaded or referenced by a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

/// A downloaded copy of an [`Attachment`] on local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}
