use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use kleene_utilities::TagIndex;

/// A zero sized tag for the indices handed out by an [IndexedSet].
pub struct SetTag;

/// The index of an element in an [IndexedSet].
pub type SetIndex = TagIndex<usize, SetTag>;

/// A set that assigns every element a unique index in order of insertion.
/// Indices are never reused, and the element for an index can be retrieved in
/// constant time.
#[derive(Clone)]
pub struct IndexedSet<T> {
    table: FxHashMap<T, SetIndex>,
    elements: Vec<T>,
}

impl<T: Clone + Eq + Hash> IndexedSet<T> {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
            elements: Vec::new(),
        }
    }

    /// Inserts the given element, and returns its index together with a boolean
    /// that is true iff the element was not present before.
    pub fn insert(&mut self, element: T) -> (SetIndex, bool) {
        if let Some(&index) = self.table.get(&element) {
            return (index, false);
        }

        let index = SetIndex::new(self.elements.len());
        self.elements.push(element.clone());
        self.table.insert(element, index);
        (index, true)
    }

    /// Returns the index of the given element, if it was inserted before.
    pub fn index(&self, element: &T) -> Option<SetIndex> {
        self.table.get(element).copied()
    }

    /// Returns the element with the given index.
    pub fn get(&self, index: SetIndex) -> Option<&T> {
        self.elements.get(*index)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true iff no element was inserted.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over all the elements in order of their index.
    pub fn iter(&self) -> impl Iterator<Item = (SetIndex, &T)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (SetIndex::new(index), element))
    }

    /// Returns the elements as a vector, where the position is the index.
    pub fn to_vec(&self) -> Vec<T> {
        self.elements.clone()
    }
}

impl<T: Clone + Eq + Hash> Default for IndexedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.elements.iter().enumerate()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_indexed_set_insert() {
        let mut set = IndexedSet::new();

        assert_eq!(set.insert("a"), (SetIndex::new(0), true));
        assert_eq!(set.insert("b"), (SetIndex::new(1), true));
        assert_eq!(set.insert("a"), (SetIndex::new(0), false));

        assert_eq!(set.len(), 2);
        assert_eq!(set.index(&"b"), Some(SetIndex::new(1)));
        assert_eq!(set.get(SetIndex::new(1)), Some(&"b"));
        assert_eq!(set.index(&"c"), None);
    }
}
