//! Chained hash index over the order list's nodes.
//!
//! Each bucket holds the key of the first node in its chain; the rest of the
//! chain is threaded through `Entry::chain_next`. Buckets only ever grow, by
//! doubling, once the next insertion would exceed the 3/4 load factor.

use crate::order_list::{Entry, OrderList};
use slotmap::DefaultKey;

/// Bucket count of a freshly constructed map.
pub const INITIAL_BUCKET_COUNT: usize = 16;

/// Load factor threshold, as `LOAD_FACTOR_NUM / LOAD_FACTOR_DEN` (0.75).
pub const LOAD_FACTOR_NUM: usize = 3;
pub const LOAD_FACTOR_DEN: usize = 4;

#[derive(Clone, Debug)]
pub(crate) struct Buckets {
    heads: Vec<Option<DefaultKey>>,
}

impl Buckets {
    pub(crate) fn with_count(count: usize) -> Self {
        debug_assert!(count > 0);
        Self {
            heads: vec![None; count],
        }
    }

    /// Smallest power-of-two count, at least `INITIAL_BUCKET_COUNT`, that
    /// holds `capacity` entries without growing.
    pub(crate) fn count_for_capacity(capacity: usize) -> usize {
        let mut count = INITIAL_BUCKET_COUNT;
        while !Self::fits(capacity, count) {
            match count.checked_mul(2) {
                Some(next) => count = next,
                None => break,
            }
        }
        count
    }

    #[inline]
    fn fits(len: usize, count: usize) -> bool {
        len.saturating_mul(LOAD_FACTOR_DEN) <= count.saturating_mul(LOAD_FACTOR_NUM)
    }

    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn index_of(&self, hash: u64) -> usize {
        (hash % self.heads.len() as u64) as usize
    }

    /// True when adding one entry to a map of `len` entries would break the
    /// load factor.
    #[inline]
    pub(crate) fn needs_growth(&self, len: usize) -> bool {
        !Self::fits(len + 1, self.count())
    }

    /// Walks the chain for `hash`, returning the first node whose entry has
    /// the same hash and satisfies `eq`.
    pub(crate) fn find<K, V>(
        &self,
        nodes: &OrderList<K, V>,
        hash: u64,
        mut eq: impl FnMut(&K) -> bool,
    ) -> Option<DefaultKey> {
        let mut cur = self.heads[self.index_of(hash)];
        while let Some(node) = cur {
            let entry = nodes.entry(node)?;
            if entry.hash == hash && eq(&entry.key) {
                return Some(node);
            }
            cur = entry.chain_next;
        }
        None
    }

    /// Prepends `node` to the chain selected by its stored hash.
    pub(crate) fn push<K, V>(&mut self, nodes: &mut OrderList<K, V>, node: DefaultKey) {
        let Some(entry) = nodes.entry_mut(node) else {
            return;
        };
        let idx = (entry.hash % self.heads.len() as u64) as usize;
        entry.chain_next = self.heads[idx];
        self.heads[idx] = Some(node);
    }

    /// Links `entry` in front of the tail and indexes it, first growing the
    /// bucket array if the load factor requires it.
    pub(crate) fn append<K, V>(
        &mut self,
        nodes: &mut OrderList<K, V>,
        entry: Entry<K, V>,
    ) -> DefaultKey {
        if self.needs_growth(nodes.len()) {
            self.grow(nodes);
        }
        let node = nodes.push_back(entry);
        self.push(nodes, node);
        node
    }

    /// Removes `node` from its chain. Returns whether it was found.
    pub(crate) fn unlink<K, V>(&mut self, nodes: &mut OrderList<K, V>, node: DefaultKey) -> bool {
        let Some(hash) = nodes.entry(node).map(|e| e.hash) else {
            return false;
        };
        let idx = self.index_of(hash);
        let mut prev: Option<DefaultKey> = None;
        let mut cur = self.heads[idx];
        while let Some(k) = cur {
            let next = nodes.entry(k).and_then(|e| e.chain_next);
            if k == node {
                match prev {
                    None => self.heads[idx] = next,
                    Some(p) => {
                        if let Some(e) = nodes.entry_mut(p) {
                            e.chain_next = next;
                        }
                    }
                }
                if let Some(e) = nodes.entry_mut(node) {
                    e.chain_next = None;
                }
                return true;
            }
            prev = cur;
            cur = next;
        }
        false
    }

    /// Doubles the bucket count and re-threads every chain.
    ///
    /// Nodes are visited in list order, so neither the order list nor any
    /// node identity changes. Stored hashes are reused; `K: Hash` is not
    /// called.
    pub(crate) fn grow<K, V>(&mut self, nodes: &mut OrderList<K, V>) {
        let old = self.count();
        let new = old.saturating_mul(2);
        tracing::trace!(
            from = old,
            to = new,
            len = nodes.len(),
            "growing bucket array"
        );
        self.rebuild(nodes, new);
    }

    /// Replaces the bucket array with `count` buckets and re-threads every
    /// live node into it.
    pub(crate) fn rebuild<K, V>(&mut self, nodes: &mut OrderList<K, V>, count: usize) {
        self.heads = vec![None; count];
        let tail = nodes.tail();
        let mut cur = nodes.first();
        while cur != tail {
            self.push(nodes, cur);
            match nodes.next(cur) {
                Some(next) => cur = next,
                None => break,
            }
        }
    }

    /// Empties every bucket, keeping the current count.
    pub(crate) fn reset(&mut self) {
        self.heads.iter_mut().for_each(|h| *h = None);
    }

    /// Length of every chain, in bucket order.
    #[cfg(any(test, feature = "bench_internal"))]
    pub(crate) fn chain_lengths<K, V>(&self, nodes: &OrderList<K, V>) -> Vec<usize> {
        self.heads
            .iter()
            .map(|head| {
                let mut n = 0;
                let mut cur = *head;
                while let Some(k) = cur {
                    n += 1;
                    cur = nodes.entry(k).and_then(|e| e.chain_next);
                }
                n
            })
            .collect()
    }
}
