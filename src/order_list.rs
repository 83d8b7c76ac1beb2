//! Entry arena and the sentinel-bounded insertion-order list.
//!
//! Every node lives in a `SlotMap`, so links are plain generational keys and
//! the arena is the single owner of all entries. Two payload-less nodes,
//! `head` and `tail`, are allocated up front and never freed; an empty list
//! is `head <-> tail`. Because both ends always exist, `splice_before` and
//! `unsplice` never branch on the list boundaries.

use slotmap::{DefaultKey, Key, SlotMap};

/// Key/value payload of a live node plus its bucket chain link.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Hash of `key`, computed once at insertion. Rehashing reuses it.
    pub(crate) hash: u64,
    pub(crate) chain_next: Option<DefaultKey>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            chain_next: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    prev: DefaultKey,
    next: DefaultKey,
    /// `None` for the two sentinels.
    entry: Option<Entry<K, V>>,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            prev: DefaultKey::null(),
            next: DefaultKey::null(),
            entry: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct OrderList<K, V> {
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    head: DefaultKey,
    tail: DefaultKey,
}

impl<K, V> OrderList<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Reserves room for `capacity` entries in addition to the sentinels.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = SlotMap::with_capacity(capacity.saturating_add(2));
        let head = nodes.insert(Node::sentinel());
        let tail = nodes.insert(Node::sentinel());
        nodes[head].next = tail;
        nodes[tail].prev = head;
        Self { nodes, head, tail }
    }

    #[inline]
    pub(crate) fn head(&self) -> DefaultKey {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> DefaultKey {
        self.tail
    }

    /// First live node, or `tail` when empty.
    #[inline]
    pub(crate) fn first(&self) -> DefaultKey {
        self.nodes[self.head].next
    }

    /// Last live node, or `head` when empty.
    #[inline]
    pub(crate) fn last(&self) -> DefaultKey {
        self.nodes[self.tail].prev
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - 2
    }

    pub(crate) fn contains(&self, node: DefaultKey) -> bool {
        self.nodes.contains_key(node)
    }

    #[inline]
    pub(crate) fn is_sentinel(&self, node: DefaultKey) -> bool {
        node == self.head || node == self.tail
    }

    /// Successor of `node`. `None` for `tail` or a key not in this list.
    pub(crate) fn next(&self, node: DefaultKey) -> Option<DefaultKey> {
        if node == self.tail {
            return None;
        }
        self.nodes.get(node).map(|n| n.next)
    }

    /// Predecessor of `node`. `None` for `head` or a key not in this list.
    pub(crate) fn prev(&self, node: DefaultKey) -> Option<DefaultKey> {
        if node == self.head {
            return None;
        }
        self.nodes.get(node).map(|n| n.prev)
    }

    #[inline]
    pub(crate) fn entry(&self, node: DefaultKey) -> Option<&Entry<K, V>> {
        self.nodes.get(node).and_then(|n| n.entry.as_ref())
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, node: DefaultKey) -> Option<&mut Entry<K, V>> {
        self.nodes.get_mut(node).and_then(|n| n.entry.as_mut())
    }

    /// Allocates a node for `entry` and links it in front of `tail`.
    pub(crate) fn push_back(&mut self, entry: Entry<K, V>) -> DefaultKey {
        let node = self.nodes.insert(Node {
            prev: DefaultKey::null(),
            next: DefaultKey::null(),
            entry: Some(entry),
        });
        self.splice_before(node, self.tail);
        node
    }

    /// Links the detached `node` immediately before `pos`.
    pub(crate) fn splice_before(&mut self, node: DefaultKey, pos: DefaultKey) {
        debug_assert!(node != self.head && node != self.tail);
        debug_assert!(
            pos != self.head,
            "cannot link in front of the head sentinel"
        );
        let prev = self.nodes[pos].prev;
        {
            let n = &mut self.nodes[node];
            n.prev = prev;
            n.next = pos;
        }
        self.nodes[prev].next = node;
        self.nodes[pos].prev = node;
    }

    /// Detaches `node` from its neighbours. The node stays allocated.
    pub(crate) fn unsplice(&mut self, node: DefaultKey) {
        debug_assert!(!self.is_sentinel(node), "sentinels are never unlinked");
        let (prev, next) = {
            let n = &self.nodes[node];
            (n.prev, n.next)
        };
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        let n = &mut self.nodes[node];
        n.prev = DefaultKey::null();
        n.next = DefaultKey::null();
    }

    /// Unlinks and frees a live node, handing back its payload.
    ///
    /// The caller must already have removed the node from its bucket chain.
    pub(crate) fn remove(&mut self, node: DefaultKey) -> Option<Entry<K, V>> {
        if self.is_sentinel(node) || !self.nodes.contains_key(node) {
            return None;
        }
        self.unsplice(node);
        self.nodes.remove(node).and_then(|n| n.entry)
    }

    /// Frees every live node. Sentinel keys are preserved so end positions
    /// taken before the clear remain valid.
    pub(crate) fn clear(&mut self) {
        let (head, tail) = (self.head, self.tail);
        self.nodes.retain(|k, _| k == head || k == tail);
        self.nodes[head].next = tail;
        self.nodes[tail].prev = head;
    }

    /// Live entries in list order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        let tail = self.tail;
        core::iter::successors(Some(self.first()), move |&n| self.next(n))
            .take_while(move |&n| n != tail)
            .filter_map(move |n| self.entry(n))
    }

    /// Consumes the list, returning the raw arena and its sentinel keys.
    pub(crate) fn into_parts(self) -> (SlotMap<DefaultKey, Node<K, V>>, DefaultKey, DefaultKey) {
        (self.nodes, self.head, self.tail)
    }

    /// Visits live entries mutably in list order.
    ///
    /// Each node's successor key is captured while the arena is borrowed
    /// once, so the yielded references are disjoint without any unsafe code.
    /// Runs in O(capacity) time and allocates O(capacity) plus O(len).
    pub(crate) fn ordered_mut(&mut self) -> Vec<(&K, &mut V)> {
        let len = self.len();
        let first = self.first();
        let mut by_node: slotmap::SecondaryMap<DefaultKey, (DefaultKey, &K, &mut V)> =
            slotmap::SecondaryMap::with_capacity(self.nodes.capacity());
        for (k, node) in self.nodes.iter_mut() {
            let next = node.next;
            if let Some(entry) = node.entry.as_mut() {
                by_node.insert(k, (next, &entry.key, &mut entry.value));
            }
        }

        let mut out = Vec::with_capacity(len);
        let mut cur = first;
        while let Some((next, key, value)) = by_node.remove(cur) {
            out.push((key, value));
            cur = next;
        }
        debug_assert_eq!(out.len(), len);
        out
    }
}

impl<K, V> Node<K, V> {
    pub(crate) fn next_key(&self) -> DefaultKey {
        self.next
    }

    pub(crate) fn prev_key(&self) -> DefaultKey {
        self.prev
    }

    pub(crate) fn into_entry(self) -> Option<Entry<K, V>> {
        self.entry
    }
}
