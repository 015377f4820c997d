//! Insertion-ordered set of identifiers.

use std::collections::HashSet;

/// Set of IDs that remembers first-insertion order.
///
/// Processing order stays deterministic while membership checks stay cheap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedIdSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl OrderedIdSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`; returns false if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// IDs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of IDs.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no ID has been inserted.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// IDs in insertion order.
    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedIdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut set = OrderedIdSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn test_collect() {
        let set: OrderedIdSet = ["3", "1", "3", "2"].into_iter().collect();
        assert!(set.contains("1"));
        assert_eq!(set.into_vec(), ["3", "1", "2"]);
    }
}
