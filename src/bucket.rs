//! Collision chain used by [`ChainedHashTable`](crate::ChainedHashTable).
//!
//! A bucket is a doubly linked list whose nodes live in a single slot vector owned by the
//! bucket and are addressed by their position in it. Removal swaps the last slot into the
//! freed position and re-points that entry's neighbours, so the vector never has holes and
//! every entry is released when the bucket is dropped.

use std::mem;

/// Position of an entry in its bucket's slot vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(usize);

/// A key-value pair linked into a bucket chain
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
    /// The entry before this one in the chain
    prev: Option<EntryHandle>,
    /// The entry after this one in the chain
    next: Option<EntryHandle>,
}

impl<V> Entry<V> {
    /// The key of this entry
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value stored under the key
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Handle of the previous entry in the chain, `None` for the head
    #[must_use]
    pub fn prev(&self) -> Option<EntryHandle> {
        self.prev
    }

    /// Handle of the next entry in the chain, `None` for the tail
    #[must_use]
    pub fn next(&self) -> Option<EntryHandle> {
        self.next
    }
}

/// An insertion-ordered chain of entries with unique keys.
///
/// Lookups scan from the head, so every keyed operation is linear in the chain length. The
/// table keeps chains short by growing, a bucket on its own makes no such promise.
#[derive(Debug, Clone)]
pub struct Bucket<V> {
    /// Storage for the entries, in no particular order
    slots: Vec<Entry<V>>,
    /// First entry of the chain
    head: Option<EntryHandle>,
    /// Last entry of the chain
    tail: Option<EntryHandle>,
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Bucket<V> {
    /// Creates an empty bucket
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new(), head: None, tail: None }
    }

    /// Number of entries in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the chain holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The first entry of the chain
    #[must_use]
    pub fn head(&self) -> Option<&Entry<V>> {
        self.head.and_then(|handle| self.entry(handle))
    }

    /// The last entry of the chain
    #[must_use]
    pub fn tail(&self) -> Option<&Entry<V>> {
        self.tail.and_then(|handle| self.entry(handle))
    }

    /// Resolves a handle obtained from [`Entry::prev`] or [`Entry::next`].
    ///
    /// Handles are only meaningful until the bucket is next modified.
    #[must_use]
    pub fn entry(&self, handle: EntryHandle) -> Option<&Entry<V>> {
        self.slots.get(handle.0)
    }

    /// Walks the chain from the head looking for `key`
    fn locate(&self, key: &str) -> Option<EntryHandle> {
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let entry = self.entry(handle)?;
            if entry.key == key {
                return Some(handle);
            }
            cursor = entry.next;
        }
        None
    }

    /// Inserts a key-value pair.
    ///
    /// An existing entry with the same key keeps its position in the chain and has its value
    /// replaced; the previous value is returned. Otherwise the pair is appended at the tail.
    pub fn push(&mut self, key: String, value: V) -> Option<V> {
        if let Some(entry) = self.locate(&key).and_then(|handle| self.slots.get_mut(handle.0)) {
            return Some(mem::replace(&mut entry.value, value));
        }

        let handle = EntryHandle(self.slots.len());
        self.slots.push(Entry { key, value, prev: self.tail, next: None });
        match self.tail.and_then(|tail| self.slots.get_mut(tail.0)) {
            Some(tail) => tail.next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);

        None
    }

    /// Finds the entry stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry<V>> {
        self.locate(key).and_then(|handle| self.entry(handle))
    }

    /// Finds the value stored under `key` for in-place modification
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let handle = self.locate(key)?;
        self.slots.get_mut(handle.0).map(|entry| &mut entry.value)
    }

    /// Removes the entry stored under `key`, returning true if there was one
    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Removes the entry stored under `key` and returns its value
    pub fn take(&mut self, key: &str) -> Option<V> {
        let handle = self.locate(key)?;
        self.unlink(handle).map(|entry| entry.value)
    }

    /// Removes the head of the chain and returns its key and value
    pub fn pop_front(&mut self) -> Option<(String, V)> {
        let head = self.head?;
        self.unlink(head).map(|entry| (entry.key, entry.value))
    }

    /// Detaches the entry at `handle` from the chain and takes it out of the slot vector
    fn unlink(&mut self, handle: EntryHandle) -> Option<Entry<V>> {
        let (prev, next) = self.entry(handle).map(|entry| (entry.prev, entry.next))?;

        match prev.and_then(|prev| self.slots.get_mut(prev.0)) {
            Some(entry) => entry.next = next,
            None => self.head = next,
        }
        match next.and_then(|next| self.slots.get_mut(next.0)) {
            Some(entry) => entry.prev = prev,
            None => self.tail = prev,
        }

        let removed = self.slots.swap_remove(handle.0);
        // the former last slot now lives at `handle`
        if handle.0 < self.slots.len() {
            self.relink(handle);
        }

        Some(removed)
    }

    /// Points the neighbours of the entry at `handle` back at it after a move
    fn relink(&mut self, handle: EntryHandle) {
        let Some((prev, next)) = self.entry(handle).map(|entry| (entry.prev, entry.next)) else {
            return;
        };

        match prev.and_then(|prev| self.slots.get_mut(prev.0)) {
            Some(entry) => entry.next = Some(handle),
            None => self.head = Some(handle),
        }
        match next.and_then(|next| self.slots.get_mut(next.0)) {
            Some(entry) => entry.prev = Some(handle),
            None => self.tail = Some(handle),
        }
    }

    /// Returns an iterator over the entries from head to tail
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { bucket: self, cursor: self.head }
    }
}

impl<'a, V> IntoIterator for &'a Bucket<V> {
    type Item = &'a Entry<V>;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a bucket in chain order
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// The bucket being walked
    bucket: &'a Bucket<V>,
    /// The next entry to yield
    cursor: Option<EntryHandle>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.bucket.entry(self.cursor?)?;
        self.cursor = entry.next;
        Some(entry)
    }
}
