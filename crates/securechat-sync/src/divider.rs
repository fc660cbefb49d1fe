// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placement of the "new messages" divider in a transcript.

use securechat_core::ChatItem;

/// Index before which the divider belongs, or `None` for no divider.
///
/// Walks backward from the tail counting operator-authored items. The
/// candidate index follows each counted item, so once `unread_count` items are
/// counted it sits on the earliest unread operator message. If the list runs
/// out first (history and unread count disagree), there is no divider.
pub fn divider_index(items: &[ChatItem], unread_count: usize) -> Option<usize> {
    if unread_count == 0 {
        return None;
    }

    let mut remaining = unread_count;
    let mut candidate = None;
    for (index, item) in items.iter().enumerate().rev() {
        if !item.is_operator_message() {
            continue;
        }
        candidate = Some(index);
        remaining -= 1;
        if remaining == 0 {
            break;
        }
    }

    if remaining > 0 {
        return None;
    }
    candidate.filter(|&index| index < items.len())
}

/// Insert `divider` before the earliest of the last `unread_count` operator
/// messages. Returns `items` unchanged when no placement applies.
pub fn place_divider(
    mut items: Vec<ChatItem>,
    unread_count: usize,
    divider: ChatItem,
) -> Vec<ChatItem> {
    if let Some(index) = divider_index(&items, unread_count) {
        items.insert(index, divider);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use securechat_core::{Author, ChatMessage};

    fn item(id: usize, author: Author) -> ChatItem {
        ChatMessage::text(id.to_string(), author, format!("message {id}")).into()
    }

    fn op(id: usize) -> ChatItem {
        item(id, Author::Operator)
    }

    fn visitor(id: usize) -> ChatItem {
        item(id, Author::Visitor)
    }

    #[test]
    fn divider_precedes_earliest_counted_operator_message() {
        let items = vec![op(0), visitor(1), op(2), op(3), visitor(4)];
        let placed = place_divider(items.clone(), 2, ChatItem::UnreadMessageDivider);

        assert_eq!(placed.len(), 6);
        assert_eq!(placed[2], ChatItem::UnreadMessageDivider);
        assert_eq!(placed[3], items[2]);
        assert_eq!(placed[4], items[3]);
    }

    #[test]
    fn zero_unread_leaves_list_untouched() {
        let items = vec![op(0), visitor(1), op(2)];
        assert_eq!(place_divider(items.clone(), 0, ChatItem::UnreadMessageDivider), items);
    }

    #[test]
    fn unread_beyond_history_leaves_list_untouched() {
        let items = vec![op(0), visitor(1), op(2), op(3), visitor(4)];
        assert_eq!(
            place_divider(items.clone(), 100, ChatItem::UnreadMessageDivider),
            items
        );
    }

    #[test]
    fn all_operator_messages_unread_puts_divider_first() {
        let items = vec![op(0), visitor(1), op(2)];
        let placed = place_divider(items, 2, ChatItem::UnreadMessageDivider);
        assert_eq!(placed[0], ChatItem::UnreadMessageDivider);
    }

    #[test]
    fn system_and_visitor_items_do_not_count() {
        let items = vec![op(0), item(1, Author::System), visitor(2), visitor(3)];
        assert_eq!(divider_index(&items, 1), Some(0));
    }

    #[test]
    fn empty_list_has_no_divider() {
        assert_eq!(place_divider(Vec::new(), 3, ChatItem::UnreadMessageDivider), Vec::new());
    }

    fn arb_items() -> impl Strategy<Value = Vec<ChatItem>> {
        proptest::collection::vec(
            prop_oneof![Just(Author::Operator), Just(Author::Visitor), Just(Author::System)],
            0..24,
        )
        .prop_map(|authors| {
            authors
                .into_iter()
                .enumerate()
                .map(|(i, author)| item(i, author))
                .collect::<Vec<ChatItem>>()
        })
    }

    proptest! {
        /// Property: exactly `unread` operator messages follow the divider when
        /// one is placed, and none is placed when the count cannot be met.
        #[test]
        fn divider_splits_off_exactly_the_unread_messages(
            items in arb_items(),
            unread in 0usize..30,
        ) {
            let operators = items.iter().filter(|i| i.is_operator_message()).count();
            let placed = place_divider(items.clone(), unread, ChatItem::UnreadMessageDivider);

            if unread == 0 || unread > operators {
                prop_assert_eq!(placed, items);
            } else {
                prop_assert_eq!(placed.len(), items.len() + 1);
                let at = placed
                    .iter()
                    .position(|i| *i == ChatItem::UnreadMessageDivider)
                    .unwrap();
                let after = placed[at + 1..].iter().filter(|i| i.is_operator_message()).count();
                prop_assert_eq!(after, unread);
                prop_assert!(placed[at + 1].is_operator_message());
            }
        }
    }
}
