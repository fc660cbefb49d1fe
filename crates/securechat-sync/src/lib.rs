// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secure-conversation synchronization.
//!
//! - [`AvailabilityResolver`] - can secure messaging be offered right now
//! - [`PendingInteraction`] - live badge state merged from four signals
//! - [`TranscriptSynchronizer`] - transcript + unread count with a timeout race
//! - [`place_divider`] - "new messages" divider placement
//! - [`MarkReadScheduler`] - delayed, cancellable mark-as-read

pub mod availability;
pub mod divider;
pub mod history;
pub mod mark_read;
pub mod pending;
pub mod section;

pub use availability::{
    AvailabilityResolver, AvailabilityStatus, AvailableReason, UnavailableReason,
};
pub use divider::{divider_index, place_divider};
pub use history::{MessagesWithUnreadCount, TranscriptSynchronizer};
pub use mark_read::{MarkReadHandle, MarkReadScheduler};
pub use pending::{PendingInteraction, PendingInteractionState, SignalUpdate};
pub use section::Section;

use securechat_core::ChatItem;

/// Turn a synchronized transcript into display rows with the unread divider placed.
pub fn transcript_items(bundle: &MessagesWithUnreadCount) -> Vec<ChatItem> {
    let items = bundle.messages.iter().cloned().map(ChatItem::from).collect();
    place_divider(
        items,
        bundle.unread_count as usize,
        ChatItem::UnreadMessageDivider,
    )
}
