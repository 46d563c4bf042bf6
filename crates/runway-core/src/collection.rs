//! Ordered collection backing the airspace and the landing queue.
//!
//! A thin wrapper over [`VecDeque`] that exposes exactly the operations the
//! engine needs: append, rank-ordered insert, find/remove by key, stable
//! re-sort, and dense renumbering. The engine is the only mutator, so no
//! shared ownership or interior links are involved.

use std::collections::VecDeque;

use runway_types::{Aircraft, CallSign};

/// An element that can be looked up by key.
pub trait Keyed {
    /// The key type.
    type Key: PartialEq + ?Sized;

    /// Borrow this element's key.
    fn key(&self) -> &Self::Key;
}

/// An element with an integer rank used for ordering.
pub trait Ranked {
    /// Current rank.
    fn rank(&self) -> i32;

    /// Overwrite the rank.
    fn set_rank(&mut self, rank: i32);
}

impl Keyed for Aircraft {
    type Key = CallSign;

    fn key(&self) -> &CallSign {
        &self.call_sign
    }
}

impl Ranked for Aircraft {
    fn rank(&self) -> i32 {
        self.priority
    }

    fn set_rank(&mut self, rank: i32) {
        self.priority = rank;
    }
}

/// An insertion-ordered sequence with keyed and ranked operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedCollection<T> {
    items: VecDeque<T>,
}

impl<T> Default for OrderedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderedCollection<T> {
    /// Create an empty collection.
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an element at the back.
    pub fn push_back(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove and return the front element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Borrow the front element.
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Iterate front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Iterate front to back, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

impl<T: Keyed> OrderedCollection<T> {
    /// Index of the first element with the given key.
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.items.iter().position(|item| item.key() == key)
    }

    /// Find the first element with the given key.
    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Whether an element with the given key is present.
    pub fn contains(&self, key: &T::Key) -> bool {
        self.position(key).is_some()
    }

    /// Remove the first element with the given key, wherever it sits.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        let idx = self.position(key)?;
        self.items.remove(idx)
    }
}

impl<T: Ranked> OrderedCollection<T> {
    /// Insert by ascending rank, after any elements of equal rank.
    ///
    /// Returns the index the element landed at.
    pub fn insert_by_rank(&mut self, item: T) -> usize {
        let rank = item.rank();
        let idx = self
            .items
            .iter()
            .position(|existing| existing.rank() > rank)
            .unwrap_or(self.items.len());
        self.items.insert(idx, item);
        idx
    }

    /// Stable sort by ascending rank. Equal ranks keep their current order.
    pub fn sort_by_rank(&mut self) {
        self.items.make_contiguous().sort_by_key(Ranked::rank);
    }

    /// Assign ranks `0..len` in current sequence order.
    pub fn renumber(&mut self) {
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.set_rank(i32::try_from(idx).unwrap_or(i32::MAX));
        }
    }

    /// Ranks in sequence order.
    pub fn ranks(&self) -> Vec<i32> {
        self.items.iter().map(Ranked::rank).collect()
    }

    /// Whether ranks are exactly `0..len` in sequence order.
    pub fn is_dense(&self) -> bool {
        self.items
            .iter()
            .enumerate()
            .all(|(idx, item)| i32::try_from(idx).is_ok_and(|expected| item.rank() == expected))
    }

    /// Whether ranks never decrease front to back.
    pub fn is_ascending(&self) -> bool {
        self.items
            .iter()
            .zip(self.items.iter().skip(1))
            .all(|(a, b)| a.rank() <= b.rank())
    }
}
