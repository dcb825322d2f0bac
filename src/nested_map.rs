//! NestedMap: the bucket engine.
//!
//! Entries live in a `SlotMap` arena; the bucket array holds the head key of
//! each bucket's chain and every node links to the next node of its bucket.
//! New nodes become the head of their chain. Resizing relinks the existing
//! nodes into a fresh bucket array without moving or copying them.

use crate::error::MapError;
use crate::hashing::bucket_index;
use crate::value::Value;
use slotmap::{DefaultKey, SlotMap};

/// Bucket count of a map created without an explicit capacity.
pub const DEFAULT_CAPACITY: usize = 5;

/// Insert grows a level before touching it once its load factor reaches this.
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.75;

/// Growth factor applied by insert-triggered resizes.
pub const GROWTH_FACTOR: f64 = 2.0;

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: Box<str>,
    pub(crate) value: Value,
    next: Option<DefaultKey>,
}

#[derive(Debug)]
pub struct NestedMap {
    buckets: Vec<Option<DefaultKey>>,
    pub(crate) nodes: SlotMap<DefaultKey, Node>,
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Option<DefaultKey>>, MapError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| MapError::AllocationFailure {
            what: "bucket array",
        })?;
    buckets.resize(capacity, None);
    Ok(buckets)
}

impl NestedMap {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A map with `capacity` buckets. A capacity of zero is allowed; the first
    /// insert grows it. Aborts if the bucket array cannot be allocated; use
    /// [`NestedMap::try_with_capacity`] for untrusted sizes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: vec![None; capacity],
            nodes: SlotMap::with_key(),
        }
    }

    /// Fallible counterpart of [`NestedMap::with_capacity`].
    pub fn try_with_capacity(capacity: usize) -> Result<Self, MapError> {
        Ok(Self {
            buckets: alloc_buckets(capacity)?,
            nodes: SlotMap::with_key(),
        })
    }

    /// Number of entries at this level; nested maps are not counted.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> Result<f64, MapError> {
        let (size, capacity) = (self.len(), self.capacity());
        if size > capacity {
            return Err(MapError::InvalidState { size, capacity });
        }
        if capacity == 0 {
            return Ok(0.0);
        }
        Ok(size as f64 / capacity as f64)
    }

    /// Rebuild the bucket array with `floor(capacity * factor)` buckets (at
    /// least one) and relink every node by its hash against the new capacity.
    /// A factor barely above 1.0 can leave a small capacity unchanged, e.g.
    /// `resize(1.5)` on a single bucket.
    ///
    /// All new indices are computed before any node is relinked, so a failure
    /// leaves the map as it was.
    pub fn resize(&mut self, factor: f64) -> Result<(), MapError> {
        if factor.is_nan() || factor <= 1.0 {
            return Err(MapError::InvalidArgument {
                reason: format!("resize factor must be greater than 1.0, got {factor}"),
            });
        }
        let old_capacity = self.capacity();
        let new_capacity = ((old_capacity as f64 * factor).floor() as usize).max(1);
        let mut buckets = alloc_buckets(new_capacity)?;

        let mut moves = Vec::new();
        moves
            .try_reserve_exact(self.len())
            .map_err(|_| MapError::AllocationFailure {
                what: "resize scratch space",
            })?;
        for head in &self.buckets {
            let mut cur = *head;
            while let Some(id) = cur {
                let node = &self.nodes[id];
                moves.push((id, bucket_index(new_capacity, &node.key)?));
                cur = node.next;
            }
        }

        for (id, b) in moves {
            self.nodes[id].next = buckets[b];
            buckets[b] = Some(id);
        }
        self.buckets = buckets;

        tracing::debug!(
            from = old_capacity,
            to = new_capacity,
            entries = self.len(),
            "resized map"
        );
        Ok(())
    }

    /// Resize by [`GROWTH_FACTOR`] when the load factor has reached
    /// [`LOAD_FACTOR_THRESHOLD`] or there are no buckets at all.
    pub(crate) fn grow_if_needed(&mut self) -> Result<(), MapError> {
        let lf = self.load_factor()?;
        if self.capacity() == 0 || lf >= LOAD_FACTOR_THRESHOLD {
            tracing::debug!(load_factor = lf, "load factor threshold reached");
            self.resize(GROWTH_FACTOR)?;
        }
        Ok(())
    }

    pub(crate) fn bucket_of(&self, key: &str) -> Result<usize, MapError> {
        bucket_index(self.capacity(), key)
    }

    /// Walk the chain of `bucket` looking for `key`.
    pub(crate) fn find_in_bucket(&self, bucket: usize, key: &str) -> Option<DefaultKey> {
        let mut cur = self.buckets[bucket];
        while let Some(id) = cur {
            let node = &self.nodes[id];
            if &*node.key == key {
                return Some(id);
            }
            cur = node.next;
        }
        None
    }

    /// Link a new node at the head of `bucket`.
    pub(crate) fn link_front(&mut self, bucket: usize, key: &str, value: Value) -> DefaultKey {
        let next = self.buckets[bucket];
        let id = self.nodes.insert(Node {
            key: key.into(),
            value,
            next,
        });
        self.buckets[bucket] = Some(id);
        id
    }

    /// Entries at this level in bucket-then-chain order. The order is neither
    /// insertion order nor sorted, and changes on resize.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            map: self,
            bucket: 0,
            cur: None,
        }
    }

    /// Tear the map down, releasing every nested map, list and string.
    /// Equivalent to dropping it.
    pub fn destroy(self) {
        tracing::debug!(entries = self.len(), "destroying map");
        drop(self);
    }

    /// Move nested maps out of this level so they can be dropped without
    /// recursion; everything else at this level is released.
    fn detach_children(&mut self, out: &mut Vec<NestedMap>) {
        for (_, node) in self.nodes.drain() {
            if let Value::Map(m) = node.value {
                out.push(m);
            }
        }
        self.buckets.iter_mut().for_each(|b| *b = None);
    }
}

impl Default for NestedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NestedMap {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut m) = pending.pop() {
            m.detach_children(&mut pending);
            // `m` now holds no nested maps, so its own drop is shallow.
        }
    }
}

/// Iterator over the entries of one level of a [`NestedMap`].
pub struct Iter<'a> {
    map: &'a NestedMap,
    bucket: usize,
    cur: Option<DefaultKey>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.cur {
                let node = &self.map.nodes[id];
                self.cur = node.next;
                return Some((&*node.key, &node.value));
            }
            if self.bucket >= self.map.buckets.len() {
                return None;
            }
            self.cur = self.map.buckets[self.bucket];
            self.bucket += 1;
        }
    }
}

impl<'a> IntoIterator for &'a NestedMap {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn chain_lengths(m: &NestedMap) -> Vec<usize> {
        m.buckets
            .iter()
            .map(|head| {
                let mut n = 0;
                let mut cur = *head;
                while let Some(id) = cur {
                    n += 1;
                    cur = m.nodes[id].next;
                }
                n
            })
            .collect()
    }

    fn put(m: &mut NestedMap, key: &str, v: &str) {
        let b = m.bucket_of(key).unwrap();
        m.link_front(b, key, Value::from(v));
    }

    #[test]
    fn default_map_is_empty_with_default_capacity() {
        let m = NestedMap::new();
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
        assert_eq!(m.capacity(), DEFAULT_CAPACITY);
        assert_eq!(m.load_factor().unwrap(), 0.0);
    }

    #[test]
    fn zero_capacity_load_factor_is_zero() {
        let m = NestedMap::with_capacity(0);
        assert_eq!(m.load_factor().unwrap(), 0.0);
    }

    /// Invariant: load factor is size / capacity, computed on demand.
    #[test]
    fn load_factor_tracks_entries() {
        let mut m = NestedMap::with_capacity(4);
        put(&mut m, "a", "1");
        assert_eq!(m.load_factor().unwrap(), 0.25);
        put(&mut m, "b", "2");
        put(&mut m, "c", "3");
        assert_eq!(m.load_factor().unwrap(), 0.75);
    }

    #[test]
    fn load_factor_rejects_overfull_map() {
        let mut m = NestedMap::with_capacity(1);
        put(&mut m, "a", "1");
        put(&mut m, "b", "2");
        match m.load_factor() {
            Err(MapError::InvalidState { size: 2, capacity: 1 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn resize_rejects_non_growing_factor() {
        let mut m = NestedMap::new();
        for f in [1.0, 0.5, -2.0, f64::NAN] {
            assert!(matches!(
                m.resize(f),
                Err(MapError::InvalidArgument { .. })
            ));
        }
        assert_eq!(m.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn small_factor_can_keep_capacity() {
        let mut m = NestedMap::with_capacity(1);
        put(&mut m, "a", "1");
        m.resize(1.5).unwrap();
        assert_eq!(m.capacity(), 1);
        assert_eq!(m.iter().count(), 1);
    }

    /// Invariant: a bucket array that cannot be reserved fails the resize and
    /// leaves capacity and every entry as they were.
    #[test]
    fn failed_resize_leaves_map_unchanged() {
        let mut m = NestedMap::new();
        let keys = ["a", "b", "c"];
        for k in keys {
            put(&mut m, k, k);
        }
        for f in [1e300, f64::INFINITY] {
            match m.resize(f) {
                Err(MapError::AllocationFailure { what }) => assert_eq!(what, "bucket array"),
                other => panic!("unexpected result: {:?}", other),
            }
            assert_eq!(m.capacity(), DEFAULT_CAPACITY);
            assert_eq!(m.len(), keys.len());
            for k in keys {
                let b = m.bucket_of(k).unwrap();
                let id = m.find_in_bucket(b, k).expect("entry survives");
                assert_eq!(m.nodes[id].value.as_str(), Some(k));
            }
        }
    }

    #[test]
    fn try_with_capacity_reports_oversized_request() {
        assert!(matches!(
            NestedMap::try_with_capacity(usize::MAX),
            Err(MapError::AllocationFailure { .. })
        ));
        assert_eq!(NestedMap::try_with_capacity(8).unwrap().capacity(), 8);
    }

    /// Invariant: resize floors `capacity * factor`, keeps every node, and puts
    /// each in the bucket its hash selects under the new capacity.
    #[test]
    fn resize_rehomes_every_node() {
        let mut m = NestedMap::with_capacity(3);
        let keys = ["alpha", "beta", "gamma"];
        for k in keys {
            put(&mut m, k, k);
        }
        m.resize(2.5).unwrap();
        assert_eq!(m.capacity(), 7);
        assert_eq!(m.len(), 3);
        assert_eq!(chain_lengths(&m).iter().sum::<usize>(), 3);
        for k in keys {
            let b = bucket_index(7, k).unwrap();
            let id = m.find_in_bucket(b, k).expect("node in its new bucket");
            assert_eq!(m.nodes[id].value.as_str(), Some(k));
        }
    }

    #[test]
    fn resize_of_empty_zero_capacity_map_yields_a_bucket() {
        let mut m = NestedMap::with_capacity(0);
        m.resize(GROWTH_FACTOR).unwrap();
        assert_eq!(m.capacity(), 1);
    }

    /// Invariant: new nodes become the head of their chain.
    #[test]
    fn chain_is_last_inserted_first() {
        let mut m = NestedMap::with_capacity(1);
        put(&mut m, "first", "1");
        put(&mut m, "second", "2");
        let order: Vec<&str> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["second", "first"]);
    }

    /// Invariant: iteration yields each entry exactly once.
    #[test]
    fn iter_visits_every_entry_once() {
        let mut m = NestedMap::with_capacity(2);
        let keys = ["k1", "k2", "k3", "k4", "k5"];
        for k in keys {
            put(&mut m, k, k);
        }
        let seen: Vec<&str> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(seen.len(), keys.len());
        let seen: BTreeSet<&str> = seen.into_iter().collect();
        assert_eq!(seen, keys.into_iter().collect());
    }

    #[test]
    fn grow_if_needed_respects_threshold() {
        let mut m = NestedMap::with_capacity(4);
        put(&mut m, "a", "1");
        put(&mut m, "b", "2");
        m.grow_if_needed().unwrap();
        assert_eq!(m.capacity(), 4);
        put(&mut m, "c", "3");
        m.grow_if_needed().unwrap();
        assert_eq!(m.capacity(), 8);
    }

    /// Invariant: teardown of a deep chain of nested maps does not recurse.
    #[test]
    fn deep_nesting_drops_without_overflow() {
        let mut root = NestedMap::with_capacity(1);
        {
            let mut cur = &mut root;
            for _ in 0..100_000 {
                let b = cur.bucket_of("k").unwrap();
                let id = cur.link_front(b, "k", Value::Map(NestedMap::with_capacity(1)));
                cur = match &mut cur.nodes[id].value {
                    Value::Map(m) => m,
                    _ => unreachable!(),
                };
            }
        }
        root.destroy();
    }
}
