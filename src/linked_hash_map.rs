//! LinkedHashMap: chained hash index over an insertion-ordered entry list.

use crate::buckets::Buckets;
use crate::cursor::{Cursor, MapId};
use crate::error::{Error, Result};
use crate::guard::OpTracker;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::order_list::{Entry, OrderList};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::DefaultKey;

/// A hash map that iterates in the order keys were first inserted.
///
/// Lookups go through a chained bucket array; iteration walks a doubly
/// linked list running through every entry. Inserting a key that is already
/// present changes nothing, not even its position; a key that is removed and
/// inserted again moves to the back.
///
/// # Examples
///
/// ```
/// use linked_hashmap::{Error, LinkedHashMap};
///
/// let mut map = LinkedHashMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
/// map.insert("c", 3);
///
/// map.erase(map.find("b")).unwrap();
/// assert_eq!(map.at("b"), Err(Error::KeyNotFound));
///
/// map.insert("b", 9);
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["a", "c", "b"]);
/// ```
pub struct LinkedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    pub(crate) list: OrderList<K, V>,
    buckets: Buckets,
    pub(crate) id: MapId,
    ops: OpTracker,
}

impl<K, V> LinkedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates a map whose bucket array already holds `capacity` entries
    /// without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V, S: Default> Default for LinkedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            list: OrderList::new(),
            buckets: Buckets::with_count(crate::INITIAL_BUCKET_COUNT),
            id: MapId::next(),
            ops: OpTracker::new(),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            list: OrderList::with_capacity(capacity),
            buckets: Buckets::with_count(Buckets::count_for_capacity(capacity)),
            id: MapId::next(),
            ops: OpTracker::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    /// Current number of buckets. Never decreases over the map's lifetime.
    pub fn bucket_count(&self) -> usize {
        self.buckets.count()
    }

    /// Cursor at the oldest entry, or the end position if the map is empty.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.list.first(), self.id)
    }

    /// The past-the-end position.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.list.tail(), self.id)
    }

    pub fn front(&self) -> Option<(&K, &V)> {
        self.list
            .entry(self.list.first())
            .map(|e| (&e.key, &e.value))
    }

    pub fn back(&self) -> Option<(&K, &V)> {
        self.list
            .entry(self.list.last())
            .map(|e| (&e.key, &e.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.list)
    }

    /// Mutable iteration in insertion order.
    ///
    /// The iterator is built eagerly: creating it walks the whole node arena
    /// once and collects every live entry, so even `iter_mut().next()` costs
    /// time proportional to the arena's capacity, which can exceed `len()`
    /// after many removals.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.list)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Mutable values in insertion order. Allocates up front like
    /// [`iter_mut`](Self::iter_mut).
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Removes the entry at `pos` and returns it.
    ///
    /// Fails with `InvalidPosition` if `pos` is the end position, belongs to
    /// another map, or refers to an entry that was already removed.
    pub fn erase(&mut self, pos: Cursor) -> Result<(K, V)> {
        self.check_cursor(&pos)?;
        if self.list.is_sentinel(pos.node()) {
            return Err(Error::InvalidPosition);
        }
        Ok(self.remove_node(pos.node()))
    }

    /// Drops every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        tracing::trace!(
            len = self.len(),
            buckets = self.bucket_count(),
            "clearing map"
        );
        self.list.clear();
        self.buckets.reset();
    }

    /// Number of entries in each bucket chain, in bucket order.
    #[cfg(any(test, feature = "bench_internal"))]
    pub fn chain_lengths(&self) -> Vec<usize> {
        self.buckets.chain_lengths(&self.list)
    }

    /// Confirms `cursor` was minted by this map and still names a live node
    /// or the end position.
    pub(crate) fn check_cursor(&self, cursor: &Cursor) -> Result<()> {
        if cursor.owner() != self.id {
            tracing::debug!(?cursor, map = ?self.id, "use of cursor from another map");
            return Err(Error::InvalidPosition);
        }
        if !self.list.contains(cursor.node()) {
            return Err(Error::InvalidPosition);
        }
        Ok(())
    }

    fn remove_node(&mut self, node: DefaultKey) -> (K, V) {
        let unlinked = self.buckets.unlink(&mut self.list, node);
        debug_assert!(unlinked, "live entry missing from its bucket chain");
        let entry = self
            .list
            .remove(node)
            .expect("node must be live after passing cursor validation");
        (entry.key, entry.value)
    }

    fn cursor_at(&self, node: DefaultKey) -> Cursor {
        Cursor::new(node, self.id)
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Hash of `q` and the node holding an equal key, if any. Callers hold
    /// the op guard.
    fn locate<Q>(&self, q: &Q) -> (u64, Option<DefaultKey>)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let node = self.buckets.find(&self.list, hash, |k| k.borrow() == q);
        (hash, node)
    }

    fn find_node<Q>(&self, op: &'static str, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.ops.enter(op);
        self.locate(q).1
    }

    /// Position of the entry for `q`, or [`end`](Self::end) if absent.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find_node("find", q) {
            Some(node) => self.cursor_at(node),
            None => self.end(),
        }
    }

    /// 1 if `q` is present, otherwise 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.find_node("count", q).is_some())
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_node("contains_key", q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node("get", q)?;
        self.list.entry(node).map(|e| (&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node("get_mut", q)?;
        self.list.entry_mut(node).map(|e| &mut e.value)
    }

    /// Value for `q`, or `KeyNotFound`.
    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    /// Mutable value for `q`, or `KeyNotFound`.
    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(Error::KeyNotFound)
    }

    /// Inserts `key -> value` at the back unless `key` is already present.
    ///
    /// Returns the entry's position and whether it was inserted. When the key
    /// exists, its value and position are left untouched and `value` is
    /// dropped.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        self.insert_inner("insert", key, || value)
    }

    /// Like [`insert`](Self::insert), but builds the value only when the key
    /// is vacant.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> (Cursor, bool)
    where
        F: FnOnce() -> V,
    {
        self.insert_inner("insert_with", key, default)
    }

    /// Value for `key`, appending `V::default()` first if it is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (pos, _) = self.insert_inner("get_or_insert_default", key, V::default);
        &mut self
            .list
            .entry_mut(pos.node())
            .expect("entry must exist immediately after insert")
            .value
    }

    fn insert_inner<F>(&mut self, op: &'static str, key: K, default: F) -> (Cursor, bool)
    where
        F: FnOnce() -> V,
    {
        let _g = self.ops.enter(op);
        let (hash, found) = self.locate(&key);
        if let Some(node) = found {
            return (self.cursor_at(node), false);
        }
        let value = default();
        let node = self
            .buckets
            .append(&mut self.list, Entry::new(key, value, hash));
        (self.cursor_at(node), true)
    }

    /// Removes `q`, returning its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.find_node("remove", q)?;
        Some(self.remove_node(node))
    }

    /// Inserts or overwrites, keeping an existing key's position.
    fn upsert(&mut self, key: K, value: V) {
        let _g = self.ops.enter("extend");
        let (hash, found) = self.locate(&key);
        if let Some(entry) = found.and_then(|node| self.list.entry_mut(node)) {
            entry.value = value;
            return;
        }
        self.buckets
            .append(&mut self.list, Entry::new(key, value, hash));
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
{
    /// Re-inserts every entry of `source`, in order, reusing stored hashes.
    fn copy_entries(&mut self, source: &Self) {
        for entry in source.list.entries() {
            self.buckets.append(
                &mut self.list,
                Entry::new(entry.key.clone(), entry.value.clone(), entry.hash),
            );
        }
    }
}

impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut map = Self {
            hasher: self.hasher.clone(),
            list: OrderList::with_capacity(self.len()),
            buckets: Buckets::with_count(self.bucket_count()),
            id: MapId::next(),
            ops: OpTracker::new(),
        };
        map.copy_entries(self);
        map
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.hasher = source.hasher.clone();
        if source.bucket_count() > self.bucket_count() {
            self.buckets = Buckets::with_count(source.bucket_count());
        }
        self.copy_entries(source);
    }
}

impl<K, V, S> fmt::Debug for LinkedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-sensitive: maps with the same entries in a different order differ.
impl<K, V, S> PartialEq for LinkedHashMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for LinkedHashMap<K, V, S> {}

impl<K, Q, V, S> Index<&Q> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if `key` is absent; see [`LinkedHashMap::at`] for the
    /// fallible form.
    fn index(&self, key: &Q) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

/// Later duplicates overwrite the value but keep the first position.
impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.upsert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.list)
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
