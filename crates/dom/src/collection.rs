//! Ordered, integer-indexed collection
//!
//! Backs children lists, attribute lists, class lists and style lists.
//!
//! ## Index model
//!
//! ```text
//! entries: [(0, a), (1, b), (2, c)]   del(1) →   [(0, a), (2, c)]
//!           ↑ key   ↑ item                        keys stay sparse
//! ```
//!
//! Iteration follows insertion order, not key order. Keys are only
//! renumbered by the splice-style operations (`append`, `prepend`, `put`,
//! `shift`); `del`, `filter`, `unique` and `pop` leave them sparse.

use crate::error::{DomError, Result};
use smallvec::SmallVec;

/// Insertion-ordered container with gap-aware integer indices
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedCollection<T> {
    /// (index, item) pairs in insertion order
    items: SmallVec<[(usize, T); 4]>,
}

impl<T> OrderedCollection<T> {
    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert at index `len()`.
    ///
    /// Fails with `IndexExists` when earlier deletions left that index
    /// occupied (e.g. `{0: a, 1: b}` minus `0` still holds `1`).
    pub fn add(&mut self, item: T) -> Result<&mut Self> {
        let index = self.len();
        if self.has(index) {
            return Err(DomError::IndexExists(index));
        }
        self.items.push((index, item));
        Ok(self)
    }

    /// Push to the end, compacting indices to `0..len`
    pub fn append(&mut self, item: T) -> &mut Self {
        self.renumber();
        let index = self.len();
        self.items.push((index, item));
        self
    }

    /// Push to the front, compacting indices to `0..len`
    pub fn prepend(&mut self, item: T) -> &mut Self {
        self.items.insert(0, (0, item));
        self.renumber();
        self
    }

    /// Splice `item` in at `position`, shifting later entries up.
    ///
    /// Positions past the end append.
    pub fn put(&mut self, position: usize, item: T) -> &mut Self {
        let position = position.min(self.len());
        self.items.insert(position, (position, item));
        self.renumber();
        self
    }

    /// Overwrite the item stored at an existing index
    pub fn replace(&mut self, index: usize, item: T) -> Result<&mut Self> {
        let slot = self
            .items
            .iter_mut()
            .find(|(i, _)| *i == index)
            .ok_or(DomError::IndexNotFound(index))?;
        slot.1 = item;
        Ok(self)
    }

    pub fn del(&mut self, index: usize) -> Result<&mut Self> {
        let position = self
            .position_of(index)
            .ok_or(DomError::IndexNotFound(index))?;
        self.items.remove(position);
        Ok(self)
    }

    pub fn del_all(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    pub fn has(&self, index: usize) -> bool {
        self.position_of(index).is_some()
    }

    pub fn item(&self, index: usize) -> Result<&T> {
        self.get(index).ok_or(DomError::IndexNotFound(index))
    }

    pub fn item_mut(&mut self, index: usize) -> Result<&mut T> {
        self.items
            .iter_mut()
            .find(|(i, _)| *i == index)
            .map(|(_, item)| item)
            .ok_or(DomError::IndexNotFound(index))
    }

    /// Non-failing lookup
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, item)| item)
    }

    /// Index of the first item matching `predicate`
    pub fn find_index<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .find(|(_, item)| predicate(item))
            .map(|(i, _)| *i)
    }

    /// Keep items satisfying `keep`. Indices are not renumbered.
    pub fn filter<F>(&mut self, mut keep: F) -> &mut Self
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(|entry| keep(&entry.1));
        self
    }

    /// Remove and return the last item
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop().map(|(_, item)| item)
    }

    /// Remove and return the first item, compacting indices
    pub fn shift(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let (_, item) = self.items.remove(0);
        self.renumber();
        Some(item)
    }

    /// (index, item) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.items.iter().map(|(i, item)| (*i, item))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().map(|(_, item)| item)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.iter_mut().map(|(_, item)| item)
    }

    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|(i, _)| *i)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values().cloned().collect()
    }

    fn renumber(&mut self) {
        for (n, entry) in self.items.iter_mut().enumerate() {
            entry.0 = n;
        }
    }

    fn position_of(&self, index: usize) -> Option<usize> {
        self.items.iter().position(|(i, _)| *i == index)
    }
}

impl<T: PartialEq> OrderedCollection<T> {
    /// Index of the first item equal to `value`, `None` when absent
    pub fn index(&self, value: &T) -> Option<usize> {
        self.find_index(|item| item == value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index(value).is_some()
    }

    /// Drop repeated values; the first occurrence keeps its index
    pub fn unique(&mut self) -> &mut Self {
        let mut kept: SmallVec<[(usize, T); 4]> = SmallVec::with_capacity(self.items.len());
        for (index, item) in self.items.drain(..) {
            if !kept.iter().any(|(_, seen)| *seen == item) {
                kept.push((index, item));
            }
        }
        self.items = kept;
        self
    }
}

impl<T> Default for OrderedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for OrderedCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().enumerate().collect(),
        }
    }
}
