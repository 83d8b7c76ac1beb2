//! Detached, bidirectional positions in a `LinkedHashMap`.
//!
//! A `Cursor` is a small `Copy` value: the arena key of a node plus the
//! identity of the map that minted it. Like `Handle`-style APIs, it does not
//! borrow the map; every access takes the map as an argument and re-validates
//! the cursor against it. A cursor can sit on a live entry or on the end
//! position (the tail sentinel), never on the head sentinel.

use crate::error::{Error, Result};
use crate::linked_hash_map::LinkedHashMap;
use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicUsize, Ordering};
use slotmap::DefaultKey;

/// Process-unique identity of one map instance. Clones get a fresh id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct MapId(NonZeroUsize);

impl MapId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        MapId(NonZeroUsize::new(id).unwrap_or(NonZeroUsize::MIN))
    }
}

/// A position in a map's insertion order.
///
/// Two cursors are equal only if they point at the same position of the
/// same map instance.
///
/// # Examples
///
/// ```
/// use linked_hashmap::LinkedHashMap;
///
/// let mut map = LinkedHashMap::new();
/// map.insert("a", 1);
/// map.insert("b", 2);
///
/// let mut cur = map.begin();
/// assert_eq!(cur.get(&map), Ok((&"a", &1)));
/// cur.move_next(&map).unwrap();
/// *cur.value_mut(&mut map).unwrap() += 10;
/// cur.move_next(&map).unwrap();
/// assert!(cur.is_end(&map));
/// assert!(cur.move_next(&map).is_err());
/// assert_eq!(map.get("b"), Some(&12));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    node: DefaultKey,
    owner: MapId,
}

impl Cursor {
    pub(crate) fn new(node: DefaultKey, owner: MapId) -> Self {
        Self { node, owner }
    }

    pub(crate) fn node(&self) -> DefaultKey {
        self.node
    }

    pub(crate) fn owner(&self) -> MapId {
        self.owner
    }

    /// Moves to the next entry in insertion order. Moving off the last entry
    /// lands on the end position; moving past the end fails.
    pub fn move_next<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        map.check_cursor(self)?;
        self.node = map.list.next(self.node).ok_or(Error::InvalidPosition)?;
        Ok(())
    }

    /// Moves to the previous entry. Fails on the first entry (and on the end
    /// position of an empty map), since the head sentinel is not a position.
    pub fn move_prev<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        map.check_cursor(self)?;
        let prev = map.list.prev(self.node).ok_or(Error::InvalidPosition)?;
        if prev == map.list.head() {
            return Err(Error::InvalidPosition);
        }
        self.node = prev;
        Ok(())
    }

    /// Whether this is `map`'s end position.
    pub fn is_end<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> bool {
        self.owner == map.id && self.node == map.list.tail()
    }

    /// Key and value at this position.
    ///
    /// Fails for the end position and for erased or foreign positions.
    pub fn get<'m, K, V, S>(&self, map: &'m LinkedHashMap<K, V, S>) -> Result<(&'m K, &'m V)> {
        map.check_cursor(self)?;
        map.list
            .entry(self.node)
            .map(|e| (&e.key, &e.value))
            .ok_or(Error::InvalidPosition)
    }

    pub fn key<'m, K, V, S>(&self, map: &'m LinkedHashMap<K, V, S>) -> Result<&'m K> {
        self.get(map).map(|(k, _)| k)
    }

    pub fn value<'m, K, V, S>(&self, map: &'m LinkedHashMap<K, V, S>) -> Result<&'m V> {
        self.get(map).map(|(_, v)| v)
    }

    pub fn value_mut<'m, K, V, S>(&self, map: &'m mut LinkedHashMap<K, V, S>) -> Result<&'m mut V> {
        map.check_cursor(self)?;
        map.list
            .entry_mut(self.node)
            .map(|e| &mut e.value)
            .ok_or(Error::InvalidPosition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> LinkedHashMap<&'static str, i32> {
        let mut m = LinkedHashMap::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("c", 3);
        m
    }

    #[test]
    fn map_ids_are_unique() {
        let a = MapId::next();
        let b = MapId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn walk_forward_to_end_then_fail() {
        let m = abc();
        let mut cur = m.begin();
        let mut seen = Vec::new();
        while !cur.is_end(&m) {
            seen.push(*cur.key(&m).unwrap());
            cur.move_next(&m).unwrap();
        }
        assert_eq!(seen, ["a", "b", "c"]);
        assert_eq!(cur, m.end());
        assert_eq!(cur.move_next(&m), Err(Error::InvalidPosition));
        assert_eq!(cur, m.end(), "failed move leaves the cursor in place");
    }

    #[test]
    fn walk_backward_stops_at_first_entry() {
        let m = abc();
        let mut cur = m.end();
        let mut seen = Vec::new();
        while cur.move_prev(&m).is_ok() {
            seen.push(*cur.key(&m).unwrap());
        }
        assert_eq!(seen, ["c", "b", "a"]);
        assert_eq!(cur, m.begin());
    }

    #[test]
    fn empty_map_begin_is_end_and_immovable() {
        let m: LinkedHashMap<i32, i32> = LinkedHashMap::new();
        let mut cur = m.begin();
        assert_eq!(cur, m.end());
        assert!(cur.is_end(&m));
        assert_eq!(cur.move_next(&m), Err(Error::InvalidPosition));
        assert_eq!(cur.move_prev(&m), Err(Error::InvalidPosition));
    }

    #[test]
    fn end_position_is_not_dereferenceable() {
        let mut m = abc();
        let end = m.end();
        assert_eq!(end.get(&m), Err(Error::InvalidPosition));
        assert_eq!(end.key(&m), Err(Error::InvalidPosition));
        assert_eq!(end.value_mut(&mut m), Err(Error::InvalidPosition));
    }

    #[test]
    fn foreign_cursor_is_rejected() {
        let m1 = abc();
        let m2 = abc();
        assert_ne!(m1.begin(), m2.begin());
        assert_ne!(m1.end(), m2.end());

        let mut cur = m1.begin();
        assert!(!m1.end().is_end(&m2));
        assert_eq!(cur.get(&m2), Err(Error::InvalidPosition));
        assert_eq!(cur.move_next(&m2), Err(Error::InvalidPosition));
        assert_eq!(cur.get(&m1), Ok((&"a", &1)));
    }

    #[test]
    fn erased_entry_invalidates_cursor() {
        let mut m = abc();
        let b = m.find("b");
        m.erase(b).unwrap();
        assert_eq!(b.get(&m), Err(Error::InvalidPosition));
        let mut moved = b;
        assert_eq!(moved.move_next(&m), Err(Error::InvalidPosition));

        // A new entry reusing the slot must not revive the old cursor.
        let (fresh, inserted) = m.insert("d", 4);
        assert!(inserted);
        assert_ne!(fresh, b);
        assert_eq!(b.value(&m), Err(Error::InvalidPosition));
    }

    #[test]
    fn cursor_survives_rehash() {
        let mut m = LinkedHashMap::new();
        let (first, _) = m.insert(0u32, 0u32);
        let before = m.bucket_count();
        for i in 1..100 {
            m.insert(i, i);
        }
        assert!(m.bucket_count() > before);
        assert_eq!(first.get(&m), Ok((&0, &0)));
        assert_eq!(first, m.begin());
    }

    #[test]
    fn end_cursor_survives_clear() {
        let mut m = abc();
        let end = m.end();
        m.clear();
        assert!(end.is_end(&m));
        assert_eq!(end, m.begin());
    }
}
