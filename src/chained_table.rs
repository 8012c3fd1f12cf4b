use std::{iter, mem, slice};

use log::{debug, trace};

use crate::{
    bucket::{self, Bucket, Entry},
    config::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, TableConfig},
    error::ConfigError,
    hash_function::hash_index,
};

/// Chain length figures for a table, see [`ChainedHashTable::chain_stats`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainStats {
    /// Number of slots holding a bucket
    pub occupied_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Average chain length over occupied slots, 0.0 for an empty table
    pub mean_chain_len: f64,
}

/// A hash table from string keys to values, resolving collisions by chaining.
///
/// Every slot of the table either is empty or owns a [`Bucket`] holding all entries whose
/// key hashes to that slot. Buckets are allocated on first use and released as soon as their
/// last entry is removed. When an insertion pushes the number of entries past
/// `capacity * load_factor_threshold`, the capacity doubles and every entry is rehashed.
/// The table never shrinks.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct ChainedHashTable<V> {
    /// Bucket slots, `None` where no key currently hashes
    buckets: Vec<Option<Bucket<V>>>,
    /// Number of entries across all buckets
    len: usize,
    /// Number of slots holding a bucket
    occupied: usize,
    /// Load factor above which the table doubles
    load_factor_threshold: f64,
}

impl<V> Default for ChainedHashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for ChainedHashTable<V>
where
    K: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedHashTable<V>
where
    K: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

/// Builds a slot vector of `capacity` empty slots
fn empty_slots<V>(capacity: usize) -> Vec<Option<Bucket<V>>> {
    iter::repeat_with(|| None).take(capacity).collect()
}

impl<V> ChainedHashTable<V> {
    /// Creates an empty table with 100 slots and a 0.75 load factor threshold
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with the given number of slots (at least one)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: empty_slots(capacity.max(1)),
            len: 0,
            occupied: 0,
            load_factor_threshold: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Creates an empty table from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`TableConfig::validate`].
    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            buckets: empty_slots(config.initial_capacity()),
            len: 0,
            occupied: 0,
            load_factor_threshold: config.load_factor_threshold(),
        })
    }

    /// The bucket that `key` hashes to, if one is allocated
    fn slot(&self, key: &str) -> Option<&Bucket<V>> {
        self.buckets.get(hash_index(key, self.buckets.len()))?.as_ref()
    }

    /// Mutable access to the bucket that `key` hashes to, if one is allocated
    fn slot_mut(&mut self, key: &str) -> Option<&mut Bucket<V>> {
        let index = hash_index(key, self.buckets.len());
        self.buckets.get_mut(index)?.as_mut()
    }

    /// Returns the bucket at `index`, allocating it first if the slot is empty
    fn bucket_at(&mut self, index: usize) -> Option<&mut Bucket<V>> {
        let slot = self.buckets.get_mut(index)?;
        if slot.is_none() {
            trace!("allocating bucket {index}");
            self.occupied = self.occupied.saturating_add(1);
        }
        Some(slot.get_or_insert_with(Bucket::new))
    }

    /// Returns true if an entry is stored under `key`
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Returns the value stored under `key`, or `V::default()` if there is none.
    ///
    /// A miss is indistinguishable from a stored default value; use [`Self::find`] when the
    /// difference matters.
    #[must_use]
    pub fn get(&self, key: &str) -> V
    where
        V: Clone + Default,
    {
        self.find(key).cloned().unwrap_or_default()
    }

    /// Returns a reference to the value stored under `key`
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&V> {
        self.slot(key)?.get(key).map(Entry::value)
    }

    /// Returns a mutable reference to the value stored under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.slot_mut(key)?.get_mut(key)
    }

    /// Stores `value` under `key`, returning the value it replaces.
    ///
    /// Inserting a new key may trigger a resize; replacing a value never does.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let index = hash_index(&key, self.buckets.len());
        let previous = self.bucket_at(index)?.push(key, value);

        if previous.is_none() {
            self.len = self.len.saturating_add(1);
            if self.exceeds_threshold() {
                self.resize();
            }
        }

        previous
    }

    /// Removes the entry stored under `key`, returning true if there was one
    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Removes the entry stored under `key` and returns its value.
    ///
    /// A bucket left empty by the removal is released.
    pub fn take(&mut self, key: &str) -> Option<V> {
        let index = hash_index(key, self.buckets.len());
        let slot = self.buckets.get_mut(index)?;
        let value = slot.as_mut()?.take(key)?;
        self.len = self.len.saturating_sub(1);

        if slot.as_ref().is_some_and(Bucket::is_empty) {
            trace!("releasing bucket {index}");
            *slot = None;
            self.occupied = self.occupied.saturating_sub(1);
        }

        Some(value)
    }

    /// Returns true if the load factor is above the growth threshold
    fn exceeds_threshold(&self) -> bool {
        self.load_factor() > self.load_factor_threshold
    }

    /// Doubles the number of slots and rehashes every entry into the new slots
    fn resize(&mut self) {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity.saturating_mul(2);
        let old_buckets = mem::replace(&mut self.buckets, empty_slots(new_capacity));
        self.occupied = 0;

        for mut bucket in old_buckets.into_iter().flatten() {
            while let Some((key, value)) = bucket.pop_front() {
                let index = hash_index(&key, new_capacity);
                if let Some(target) = self.bucket_at(index) {
                    target.push(key, value);
                }
            }
        }

        debug!(
            "resized table from {old_capacity} to {new_capacity} slots ({} entries in {} buckets)",
            self.len, self.occupied
        );
    }

    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the table
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of slots holding a bucket
    #[must_use]
    pub fn occupied_buckets(&self) -> usize {
        self.occupied
    }

    /// Returns the load factor above which the table doubles
    #[must_use]
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor_threshold
    }

    /// Returns the current ratio of entries to slots
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Removes every entry, keeping the current capacity
    pub fn clear(&mut self) {
        for slot in &mut self.buckets {
            *slot = None;
        }
        self.len = 0;
        self.occupied = 0;
    }

    /// Summarises how entries are spread over the buckets
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn chain_stats(&self) -> ChainStats {
        let longest_chain =
            self.buckets.iter().flatten().map(Bucket::len).max().unwrap_or_default();
        let mean_chain_len =
            if self.occupied == 0 { 0.0 } else { self.len as f64 / self.occupied as f64 };

        ChainStats { occupied_buckets: self.occupied, longest_chain, mean_chain_len }
    }

    /// Returns an iterator over the key-value pairs, slot by slot and in chain order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: self.buckets.iter(), chain: None }
    }
}

impl<'a, V> IntoIterator for &'a ChainedHashTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the key-value pairs of the table
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Slots not visited yet
    slots: slice::Iter<'a, Option<Bucket<V>>>,
    /// Chain of the bucket currently being walked
    chain: Option<bucket::Iter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.as_mut().and_then(Iterator::next) {
                return Some((entry.key(), entry.value()));
            }
            if let Some(bucket) = self.slots.next()? {
                self.chain = Some(bucket.iter());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;

    /// A one-slot table, so every key collides
    fn single_slot_table(threshold: f64) -> ChainedHashTable<i32> {
        let config =
            TableConfig::default().with_initial_capacity(1).with_load_factor_threshold(threshold);
        ChainedHashTable::with_config(config).unwrap()
    }

    #[test]
    fn test_set_and_get() {
        let mut table = ChainedHashTable::new();
        table.set("key1", 10);
        table.set("key2", 20);
        table.set("key3", 30);

        assert_eq!(table.get("key1"), 10);
        assert_eq!(table.get("key2"), 20);
        assert_eq!(table.get("key3"), 30);

        assert!(table.remove("key2"));
        assert_eq!(table.get("key2"), 0);
        assert!(!table.has("key2"));
        assert!(table.has("key1"));
    }

    #[test]
    fn test_missing_key_reads_default() {
        let table: ChainedHashTable<String> = ChainedHashTable::new();
        assert_eq!(table.get("nope"), String::new());
        assert!(!table.has("nope"));
        assert_eq!(table.find("nope"), None);
    }

    #[test]
    fn test_find_tells_default_from_missing() {
        let mut table = ChainedHashTable::new();
        table.set("zero", 0);
        assert_eq!(table.get("zero"), table.get("missing"));
        assert_eq!(table.find("zero"), Some(&0));
        assert_eq!(table.find("missing"), None);
    }

    #[test]
    fn test_overwrite() {
        let mut table = ChainedHashTable::new();
        assert_eq!(table.set("key1", 1), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.set("key1", 2), Some(1));
        assert_eq!(table.get("key1"), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_twice() {
        let mut table = ChainedHashTable::new();
        table.set("key1", 1);

        assert!(table.remove("key1"));
        assert!(!table.has("key1"));
        assert!(!table.remove("key1"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_remove_releases_bucket() {
        let mut table = ChainedHashTable::new();
        table.set("key1", 1);
        assert_eq!(table.occupied_buckets(), 1);

        table.remove("key1");
        assert_eq!(table.occupied_buckets(), 0);
        assert_eq!(table.chain_stats().longest_chain, 0);
    }

    #[test]
    fn test_resize_once_per_threshold_crossing() {
        let mut table = ChainedHashTable::new();
        assert_eq!(table.capacity(), 100);

        for i in 0..75 {
            table.set(format!("key{i}"), i);
        }
        // 75 / 100 sits exactly on the threshold
        assert_eq!(table.capacity(), 100);

        table.set("key75", 75);
        assert_eq!(table.capacity(), 200);

        for i in 76..150 {
            table.set(format!("key{i}"), i);
        }
        assert_eq!(table.capacity(), 200);

        table.set("key150", 150);
        assert_eq!(table.capacity(), 400);

        for i in 0..=150 {
            assert_eq!(table.get(&format!("key{i}")), i);
        }
    }

    #[test]
    fn test_values_survive_rehash() {
        let mut table = ChainedHashTable::new();
        for i in 0..150 {
            table.set(format!("key{i}"), i * 10);
        }

        assert!(table.capacity() > 100);
        assert_eq!(table.get("key100"), 1000);
        assert_eq!(table.len(), 150);
        for i in 0..150 {
            assert_eq!(table.find(&format!("key{i}")), Some(&(i * 10)));
        }
    }

    #[test]
    fn test_overwrite_does_not_resize() {
        let mut table = ChainedHashTable::with_capacity(4);
        for _ in 0..10 {
            table.set("same", 1);
        }
        assert_eq!(table.capacity(), 4);
    }

    #[test]
    fn test_growth_follows_entry_count() {
        // every key shares the only slot, so just one bucket is ever allocated
        let mut table = single_slot_table(2.0);
        table.set("a", 1);
        table.set("b", 2);
        assert_eq!(table.capacity(), 1);
        assert_eq!(table.occupied_buckets(), 1);

        table.set("c", 3);
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("a"), 1);
        assert_eq!(table.get("b"), 2);
        assert_eq!(table.get("c"), 3);
    }

    #[test]
    fn test_collisions_share_a_chain() {
        let mut table = single_slot_table(100.0);
        for i in 0..10 {
            table.set(format!("key{i}"), i);
        }

        let stats = table.chain_stats();
        assert_eq!(stats.occupied_buckets, 1);
        assert_eq!(stats.longest_chain, 10);
        assert!((stats.mean_chain_len - 10.0).abs() < f64::EPSILON);

        assert!(table.remove("key4"));
        for i in (0..10).filter(|&i| i != 4) {
            assert_eq!(table.find(&format!("key{i}")), Some(&i));
        }
        assert_eq!(table.chain_stats().longest_chain, 9);
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let zero = TableConfig::default().with_initial_capacity(0);
        assert_eq!(
            ChainedHashTable::<i32>::with_config(zero).unwrap_err(),
            ConfigError::ZeroCapacity
        );

        let negative = TableConfig::default().with_load_factor_threshold(-1.0);
        assert_eq!(
            ChainedHashTable::<i32>::with_config(negative).unwrap_err(),
            ConfigError::InvalidLoadFactor(-1.0)
        );
    }

    #[test]
    fn test_with_capacity_zero_clamped() {
        let mut table = ChainedHashTable::with_capacity(0);
        assert_eq!(table.capacity(), 1);
        table.set("key", 1);
        assert_eq!(table.get("key"), 1);
    }

    #[test]
    fn test_take_and_get_mut() {
        let mut table = ChainedHashTable::new();
        table.set("key1", 1);

        if let Some(value) = table.get_mut("key1") {
            *value += 10;
        }
        assert_eq!(table.take("key1"), Some(11));
        assert_eq!(table.take("key1"), None);
        assert!(table.get_mut("key1").is_none());
    }

    #[test]
    fn test_clear() {
        let mut table = ChainedHashTable::new();
        for i in 0..100 {
            table.set(format!("key{i}"), i);
        }
        let capacity = table.capacity();

        table.clear();

        assert!(table.is_empty());
        assert_eq!(table.occupied_buckets(), 0);
        assert_eq!(table.capacity(), capacity);
        assert!(!table.has("key1"));
    }

    #[test]
    fn test_iter() {
        let mut table = ChainedHashTable::new();
        table.set("key1", 1);
        table.set("key2", 2);
        table.set("key3", 3);

        let mut pairs: Vec<(&str, i32)> = table.iter().map(|(k, &v)| (k, v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, [("key1", 1), ("key2", 2), ("key3", 3)]);

        let mut sum = 0;
        for (_, value) in &table {
            sum += value;
        }
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut table: ChainedHashTable<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        table.extend(vec![("c".to_string(), 3), ("a".to_string(), 10)]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("a"), 10);
        assert_eq!(table.get("c"), 3);
    }

    #[test]
    fn test_load_factor() {
        let mut table = ChainedHashTable::with_capacity(16);
        for i in 0..8 {
            table.set(i.to_string(), i);
        }
        assert!((table.load_factor() - 0.5).abs() < f64::EPSILON);
        assert!((table.load_factor_threshold() - 0.75).abs() < f64::EPSILON);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Set(String, i32),
        Remove(String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            ("[a-d]{1,3}", any::<i32>()).prop_map(|(key, value)| Op::Set(key, value)),
            "[a-d]{1,3}".prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_agrees_with_std_hash_map(ops in prop::collection::vec(op_strategy(), 0..300)) {
            let config = TableConfig::default().with_initial_capacity(4);
            let mut table = ChainedHashTable::with_config(config).unwrap();
            let mut model = HashMap::new();

            for op in ops {
                match op {
                    Op::Set(key, value) => {
                        prop_assert_eq!(table.set(key.clone(), value), model.insert(key, value));
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(table.remove(&key), model.remove(&key).is_some());
                    }
                }
                prop_assert!(table.load_factor() <= table.load_factor_threshold());
            }

            prop_assert_eq!(table.len(), model.len());
            prop_assert_eq!(table.iter().count(), model.len());
            for (key, value) in &model {
                prop_assert_eq!(table.find(key), Some(value));
            }
        }
    }
}
