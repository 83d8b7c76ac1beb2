#![cfg(test)]

// Property tests for LinkedHashMap kept inside the crate so they can look at
// bucket chains and the load factor directly.

use crate::cursor::Cursor;
use crate::error::Error;
use crate::linked_hash_map::LinkedHashMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and shorter
// op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    InsertWith(usize, i32),
    GetOrDefault(usize, i32),
    Erase(usize),
    Remove(usize),
    At(usize),
    Mutate(usize, i32),
    Clear,
    Walk,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertWith(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::GetOrDefault(i, d)),
            2 => idx.clone().prop_map(OpI::Erase),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::At),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            2 => Just(OpI::Walk),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Ordered model: a Vec of (key, value) in insertion order.
#[derive(Default)]
struct Model {
    entries: Vec<(Key, i32)>,
}

impl Model {
    fn pos(&self, k: &Key) -> Option<usize> {
        self.entries.iter().position(|(kk, _)| kk == k)
    }
    fn get(&self, k: &Key) -> Option<i32> {
        self.pos(k).map(|i| self.entries[i].1)
    }
}

fn run<S: BuildHasher>(
    mut sut: LinkedHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model = Model::default();
    let mut stale: Vec<Cursor> = Vec::new();
    let mut max_buckets = sut.bucket_count();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let existing = model.pos(&k);
                let (cur, inserted) = sut.insert(k.clone(), v);
                prop_assert_eq!(inserted, existing.is_none());
                if existing.is_none() {
                    model.entries.push((k.clone(), v));
                }
                prop_assert_eq!(cur.key(&sut), Ok(&k));
                prop_assert_eq!(cur.value(&sut).copied(), Ok(model.get(&k).unwrap()));
            }
            OpI::InsertWith(i, v) => {
                let k = key_from(&pool, i);
                let existing = model.pos(&k);
                let mut ran = false;
                let (_cur, inserted) = sut.insert_with(k.clone(), || {
                    ran = true;
                    v
                });
                prop_assert_eq!(inserted, existing.is_none());
                prop_assert_eq!(ran, existing.is_none(), "constructor runs only when vacant");
                if existing.is_none() {
                    model.entries.push((k, v));
                }
            }
            OpI::GetOrDefault(i, d) => {
                let k = key_from(&pool, i);
                let slot = sut.get_or_insert_default(k.clone());
                *slot = slot.wrapping_add(d);
                match model.pos(&k) {
                    Some(p) => model.entries[p].1 = model.entries[p].1.wrapping_add(d),
                    None => model.entries.push((k, d)),
                }
            }
            OpI::Erase(i) => {
                let k = key_from(&pool, i);
                let cur = sut.find(&k);
                match model.pos(&k) {
                    Some(p) => {
                        let (kk, vv) = model.entries.remove(p);
                        prop_assert_eq!(sut.erase(cur), Ok((kk, vv)));
                        stale.push(cur);
                    }
                    None => {
                        prop_assert!(cur.is_end(&sut));
                        prop_assert_eq!(sut.erase(cur), Err(Error::InvalidPosition));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let expect = model.pos(&k).map(|p| model.entries.remove(p).1);
                prop_assert_eq!(sut.remove(k.0.as_str()), expect);
            }
            OpI::At(i) => {
                let k = key_from(&pool, i);
                let got = sut.at(k.0.as_str()).copied();
                prop_assert_eq!(got, model.get(&k).ok_or(Error::KeyNotFound));
                prop_assert_eq!(sut.count(&k), usize::from(model.pos(&k).is_some()));
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                let cur = sut.find(&k);
                if let Some(p) = model.pos(&k) {
                    let v = cur.value_mut(&mut sut).expect("live cursor resolves");
                    *v = v.wrapping_add(d);
                    model.entries[p].1 = model.entries[p].1.wrapping_add(d);
                } else {
                    prop_assert_eq!(cur.value_mut(&mut sut), Err(Error::InvalidPosition));
                }
            }
            OpI::Clear => {
                let cursors: Vec<Cursor> = pool
                    .iter()
                    .map(|s| sut.find(s.as_str()))
                    .filter(|c| !c.is_end(&sut))
                    .collect();
                sut.clear();
                model.entries.clear();
                stale.extend(cursors);
            }
            OpI::Walk => {
                // Forward with a cursor, then backward, against the model.
                let mut fwd = Vec::new();
                let mut cur = sut.begin();
                while !cur.is_end(&sut) {
                    let (k, v) = cur.get(&sut).expect("non-end cursor resolves");
                    fwd.push((k.clone(), *v));
                    cur.move_next(&sut).expect("advance before end");
                }
                prop_assert_eq!(cur.move_next(&sut), Err(Error::InvalidPosition));
                prop_assert_eq!(&fwd, &model.entries);

                let mut back = Vec::new();
                while cur.move_prev(&sut).is_ok() {
                    back.push(cur.key(&sut).cloned().expect("resolves"));
                }
                back.reverse();
                let model_keys: Vec<Key> = model.entries.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(back, model_keys);
            }
        }

        // Post-conditions after each op
        // 1) Order and contents match the model exactly.
        let seen: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&seen, &model.entries);
        let seen_rev: Vec<Key> = sut.keys().rev().cloned().collect();
        let model_rev: Vec<Key> = model
            .entries
            .iter()
            .rev()
            .map(|(k, _)| k.clone())
            .collect();
        prop_assert_eq!(seen_rev, model_rev);
        // 2) Size parity and load factor; buckets never shrink.
        prop_assert_eq!(sut.len(), model.entries.len());
        prop_assert_eq!(sut.is_empty(), model.entries.is_empty());
        prop_assert!(
            sut.len() * crate::LOAD_FACTOR_DEN <= sut.bucket_count() * crate::LOAD_FACTOR_NUM
        );
        prop_assert!(sut.bucket_count() >= max_buckets);
        max_buckets = sut.bucket_count();
        // 3) Every live entry sits in exactly one chain.
        prop_assert_eq!(sut.chain_lengths().iter().sum::<usize>(), sut.len());
        // 4) Erased positions never resolve again.
        for c in &stale {
            prop_assert_eq!(c.get(&sut), Err(Error::InvalidPosition));
        }
    }
    Ok(())
}

// Property: state-machine equivalence against an ordered Vec model.
// Invariants exercised across random operation sequences:
// - Iteration order equals first-insertion order; duplicates never move.
// - `erase(find(k))` removes exactly k; stale cursors stay invalid.
// - `at`/`count`/`find` parity with the model.
// - Load factor holds after every op and buckets only grow.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(LinkedHashMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key lands in one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions, which stresses
// chain unlinking from the head, middle and tail of a single chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(LinkedHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Property: a clone matches its source and diverges independently.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_clone_independent(keys in proptest::collection::vec(0u16..200, 0..80), extra in 200u16..300) {
        let mut src: LinkedHashMap<u16, u16> = LinkedHashMap::new();
        for &k in &keys {
            src.insert(k, k);
        }
        let before: Vec<(u16, u16)> = src.iter().map(|(k, v)| (*k, *v)).collect();

        let mut copy = src.clone();
        prop_assert_eq!(&copy, &src);
        prop_assert_eq!(copy.bucket_count(), src.bucket_count());

        copy.insert(extra, 0);
        if let Some(&first) = keys.first() {
            copy.remove(&first);
        }
        for v in copy.values_mut() {
            *v = v.wrapping_add(1);
        }

        let after: Vec<(u16, u16)> = src.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(before, after);
    }
}
