//! Sharded key/value accumulator used while scoring documents.
//!
//! Keys are routed to one of a fixed number of shards by hash. Each shard is
//! an ordered map behind its own lock, so concurrent updates only contend when
//! their keys land in the same shard.

use crate::config::DEFAULT_SHARD_COUNT;
use crate::error::{Result, SearchError};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::ops::AddAssign;

pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Ord + Hash,
{
    pub fn new() -> Self {
        Self::build(DEFAULT_SHARD_COUNT)
    }

    pub fn with_shard_count(shard_count: usize) -> Result<Self> {
        if shard_count == 0 {
            return Err(SearchError::InvalidArgument(
                "concurrent map needs at least one shard".into(),
            ));
        }
        Ok(Self::build(shard_count))
    }

    fn build(shard_count: usize) -> Self {
        let shards = (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let idx = (hasher.finish() % self.shards.len() as u64) as usize;
        &self.shards[idx]
    }

    /// Exclusive access to the slot for `key`, inserting `V::default()` first
    /// if the key is absent. The key's shard stays locked while the guard lives.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V>
    where
        V: Default,
    {
        let shard = self.shard_for(&key).lock();
        MutexGuard::map(shard, |entries| entries.entry(key).or_default())
    }

    pub fn accumulate(&self, key: K, delta: V)
    where
        V: AddAssign + Default,
    {
        *self.access(key) += delta;
    }

    pub fn erase(&self, key: &K) -> Option<V> {
        self.shard_for(key).lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Merge every shard into one ordered map.
    ///
    /// Shards are locked one after another, so the result is only a consistent
    /// picture once writers have finished.
    pub fn snapshot(&self) -> BTreeMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for shard in &self.shards {
            let entries = shard.lock();
            merged.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Consume the map and merge its shards into one ordered map.
    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            merged.append(&mut shard.into_inner());
        }
        merged
    }
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Ord + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn zero_shards_rejected() {
        let res = ConcurrentMap::<i32, f64>::with_shard_count(0);
        assert!(matches!(res, Err(SearchError::InvalidArgument(_))));
    }

    #[test]
    fn accumulate_creates_and_adds() {
        let map = ConcurrentMap::<i32, i64>::with_shard_count(4).unwrap();
        map.accumulate(7, 3);
        map.accumulate(7, 4);
        map.accumulate(1, 1);
        let merged = map.into_ordinary_map();
        assert_eq!(merged.get(&7), Some(&7));
        assert_eq!(merged.get(&1), Some(&1));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn access_guard_exposes_slot() {
        let map = ConcurrentMap::<i32, i64>::new();
        *map.access(5) += 10;
        assert_eq!(*map.access(5), 10);
        assert_eq!(*map.access(6), 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn erase_removes_slot() {
        let map = ConcurrentMap::<i32, i64>::new();
        map.accumulate(1, 2);
        assert_eq!(map.erase(&1), Some(2));
        assert_eq!(map.erase(&1), None);
        assert!(map.is_empty());
    }

    #[test]
    fn parallel_updates_on_shared_keys_are_not_lost() {
        let map = ConcurrentMap::<i32, i64>::with_shard_count(3).unwrap();
        (0..10_000).into_par_iter().for_each(|i| map.accumulate(i % 17, 1));
        let merged = map.snapshot();
        assert_eq!(merged.values().sum::<i64>(), 10_000);
        assert_eq!(merged.len(), 17);
    }

    #[test]
    fn parallel_erase_while_accumulating_other_keys() {
        let map = ConcurrentMap::<i32, i64>::new();
        for key in 0..100 {
            map.accumulate(key, 1);
        }
        rayon::join(
            || (0..50).into_par_iter().for_each(|key| {
                map.erase(&key);
            }),
            || (100..200).into_par_iter().for_each(|key| map.accumulate(key, 1)),
        );
        let merged = map.into_ordinary_map();
        assert_eq!(merged.len(), 150);
        assert!(merged.keys().all(|k| *k >= 50));
    }

    #[test]
    fn merged_map_is_ordered() {
        let map = ConcurrentMap::<i32, i64>::with_shard_count(5).unwrap();
        for key in [9, 3, 27, 1, 14] {
            map.accumulate(key, key as i64);
        }
        let keys: Vec<i32> = map.into_ordinary_map().into_keys().collect();
        assert_eq!(keys, vec![1, 3, 9, 14, 27]);
    }
}
