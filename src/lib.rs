//! linked-hashmap: a single-threaded hash map that iterates in insertion
//! order, with detached cursors for bidirectional traversal and erasure.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) average keyed access plus deterministic, insertion-ordered
//!   traversal, with every structural link expressed as an arena key rather
//!   than a pointer.
//! - Layers:
//!   - `order_list::OrderList<K, V>`: a `SlotMap` arena owning every node,
//!     plus two permanent sentinel nodes (head, tail) bounding a doubly
//!     linked list in insertion order.
//!   - `buckets::Buckets`: a power-of-two array of chain heads; chains are
//!     threaded through the same nodes via `chain_next`.
//!   - `LinkedHashMap<K, V, S>`: public API gluing both together, plus
//!     `Cursor` positions and std-style iterators.
//!
//! Constraints
//! - Single-threaded: no internal locking. The map is `Send` when its
//!   contents are, so external synchronization works; it is not `Sync`.
//! - Unique keys. Re-inserting a present key is a no-op that reports the
//!   existing position; order never changes except by removal.
//! - Buckets grow by doubling just before an insert would exceed a 3/4 load
//!   factor, and never shrink.
//!
//! Hasher and rehashing invariants
//! - Each entry stores the `u64` hash computed at insertion. Growth, clone
//!   and chain removal reuse it; `K: Hash` is never invoked after insertion.
//! - Growth rebuilds chains only. Nodes keep their arena keys, so cursors
//!   stay valid across a rehash.
//!
//! Cursor validity
//! - A `Cursor` carries its node key and the id of the map that created it.
//!   Cursors from another map, cursors to removed entries (generational keys
//!   make these detectable even after slot reuse), moving past either end,
//!   and dereferencing the end position all yield `Error::InvalidPosition`.
//!
//! Reentrancy policy
//! - Entry points that run user code (`Hash`, `Eq`, value constructors) hold
//!   a debug-only guard; re-entering the same map from that code panics in
//!   debug builds.

mod buckets;
mod cursor;
mod error;
mod guard;
pub mod iter;
mod linked_hash_map;
mod linked_hash_map_proptest;
mod order_list;

// Public surface
pub use buckets::{INITIAL_BUCKET_COUNT, LOAD_FACTOR_DEN, LOAD_FACTOR_NUM};
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use linked_hash_map::LinkedHashMap;
