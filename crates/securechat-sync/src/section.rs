// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named, index-addressed item container backing a list section.
//!
//! Row indices handed to the UI stay valid while content is replaced in place;
//! only appends and explicit removals shift positions.

use securechat_core::SecureChatError;

#[derive(Debug, Clone, PartialEq)]
pub struct Section<T> {
    name: String,
    items: Vec<T>,
}

impl<T> Section<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Replace the item at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T, SecureChatError> {
        let len = self.items.len();
        let slot = self.items.get_mut(index).ok_or_else(|| {
            SecureChatError::InvalidInput(format!(
                "index {index} out of bounds for section `{}` of length {len}",
                self.name
            ))
        })?;
        Ok(std::mem::replace(slot, item))
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Append all `items` after the current tail.
    pub fn append(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    /// Swap the whole content, e.g. after a fresh transcript load.
    pub fn set(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Index of the first item matching `predicate`.
    pub fn position(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_keeps_other_indices_stable() {
        let mut section = Section::with_items("messages", vec!["a", "b", "c"]);
        let old = section.replace(1, "B").unwrap();

        assert_eq!(old, "b");
        assert_eq!(section.items(), &["a", "B", "c"]);
        assert_eq!(section.position(|s| *s == "c"), Some(2));
    }

    #[test]
    fn replace_out_of_bounds_is_an_error() {
        let mut section = Section::with_items("messages", vec![1]);
        let err = section.replace(5, 2).expect_err("index 5 is out of bounds");
        assert!(err.to_string().contains("messages"));
        assert_eq!(section.items(), &[1]);
    }

    #[test]
    fn append_adds_after_tail() {
        let mut section = Section::new("uploads");
        section.push(1);
        section.append([2, 3]);
        assert_eq!(section.len(), 3);
        assert_eq!(section.get(2), Some(&3));
        assert_eq!(section.name(), "uploads");
    }

    #[test]
    fn remove_ignores_missing_index() {
        let mut section = Section::with_items("s", vec![1, 2]);
        assert_eq!(section.remove(9), None);
        assert_eq!(section.remove(0), Some(1));
        assert_eq!(section.items(), &[2]);
        section.set(Vec::new());
        assert!(section.is_empty());
    }
}
