// LinkedHashMap integration tests (public API only).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Order: iteration yields keys in first-insertion order.
// - Stability: re-inserting a present key changes neither value nor order.
// - Round-trip: insert then at/find observe the value; erase(find(k))
//   makes count(k) zero.
// - Growth: len <= bucket_count * 3/4 after every insert; buckets never
//   shrink.
// - Copy independence: clones share nothing with their source.
use linked_hashmap::{
    Error, LinkedHashMap, INITIAL_BUCKET_COUNT, LOAD_FACTOR_DEN, LOAD_FACTOR_NUM,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::BuildHasherDefault;

fn keys<K: Clone, V, S>(m: &LinkedHashMap<K, V, S>) -> Vec<K> {
    m.keys().cloned().collect()
}

// Test: the a/b/c walkthrough.
// Verifies: erase removes from both iteration and lookup; re-insert goes last.
#[test]
fn insert_erase_reinsert_walkthrough() {
    let mut m = LinkedHashMap::new();
    m.insert('a', 1);
    m.insert('b', 2);
    m.insert('c', 3);
    assert_eq!(keys(&m), ['a', 'b', 'c']);

    let pos = m.find(&'b');
    assert_eq!(m.erase(pos), Ok(('b', 2)));
    assert_eq!(keys(&m), ['a', 'c']);
    assert_eq!(m.count(&'b'), 0);
    assert_eq!(m.at(&'b'), Err(Error::KeyNotFound));

    m.insert('b', 9);
    assert_eq!(keys(&m), ['a', 'c', 'b']);
    assert_eq!(m[&'b'], 9);
}

// Test: order preservation with interleaved lookups.
// Assumes: lookups never reorder entries.
#[test]
fn order_preserved_across_lookups() {
    let mut m = LinkedHashMap::new();
    let input: Vec<u64> = (0..500).map(|i| (i * 7919) % 1009).collect();
    for (i, &k) in input.iter().enumerate() {
        m.insert(k, i);
        if i % 3 == 0 {
            assert!(m.contains_key(&input[i / 2]));
            let _ = m.get(&input[i / 3]);
        }
    }
    assert_eq!(keys(&m), input);
}

// Test: re-insertion stability.
// Verifies: duplicate insert reports false, keeps original value and slot.
#[test]
fn reinsert_keeps_value_and_position() {
    let mut m = LinkedHashMap::new();
    for k in ["x", "y", "z"] {
        m.insert(k.to_string(), k.len());
    }
    let before = m.find("y");
    let (pos, inserted) = m.insert("y".to_string(), 100);
    assert!(!inserted);
    assert_eq!(pos, before);
    assert_eq!(m.at("y"), Ok(&1));
    assert_eq!(keys(&m), ["x", "y", "z"]);
}

// Test: round-trip of insert/at and erase/count.
#[test]
fn round_trip() {
    let mut m = LinkedHashMap::new();
    for i in 0..64 {
        m.insert(i, i * i);
        assert_eq!(m.at(&i), Ok(&(i * i)));
    }
    for i in (0..64).rev().step_by(2) {
        m.erase(m.find(&i)).unwrap();
        assert_eq!(m.count(&i), 0);
    }
    assert_eq!(m.len(), 32);
}

// Test: the map-style mutable subscript.
// Verifies: appends a default value at the tail only when absent.
#[test]
fn get_or_insert_default_subscript() {
    let mut m: LinkedHashMap<&str, u32> = LinkedHashMap::new();
    *m.get_or_insert_default("hits") += 1;
    *m.get_or_insert_default("misses") += 1;
    *m.get_or_insert_default("hits") += 1;
    assert_eq!(m["hits"], 2);
    assert_eq!(m["misses"], 1);
    assert_eq!(keys(&m), ["hits", "misses"]);
}

// Test: load factor and monotone bucket growth.
#[test]
fn load_factor_invariant() {
    let mut m = LinkedHashMap::new();
    assert_eq!(m.bucket_count(), INITIAL_BUCKET_COUNT);
    let mut prev = m.bucket_count();
    for i in 0..5000u32 {
        m.insert(i, ());
        assert!(m.len() * LOAD_FACTOR_DEN <= m.bucket_count() * LOAD_FACTOR_NUM);
        assert!(m.bucket_count() >= prev);
        prev = m.bucket_count();
    }
    retain_first(&mut m, 10);
    assert_eq!(m.bucket_count(), prev);
}

// Removes everything but the first `n` entries by walking a cursor.
fn retain_first(m: &mut LinkedHashMap<u32, ()>, n: usize) {
    let mut cur = m.begin();
    for _ in 0..n {
        cur.move_next(&*m).unwrap();
    }
    while !cur.is_end(&*m) {
        let doomed = cur;
        cur.move_next(&*m).unwrap();
        m.erase(doomed).unwrap();
    }
    assert_eq!(m.len(), n);
    assert_eq!(keys(m), (0..n as u32).collect::<Vec<_>>());
}

// Test: copy independence.
#[test]
fn clone_independence() {
    let mut original: LinkedHashMap<String, Vec<u8>> = LinkedHashMap::new();
    for i in 0..10u8 {
        original.insert(format!("k{i}"), vec![i]);
    }
    let mut copy = original.clone();
    copy.get_mut("k0").unwrap().push(99);
    copy.remove("k1");
    copy.insert("new".into(), vec![]);
    copy.clear();

    assert_eq!(original.len(), 10);
    assert_eq!(original["k0"], [0]);
    assert_eq!(keys(&original).first().map(String::as_str), Some("k0"));
}

// Test: assignment semantics via clone_from.
#[test]
fn clone_from_deep_copies_over_cleared_destination() {
    let src: LinkedHashMap<i32, &str> = [(3, "c"), (1, "a")].into_iter().collect();
    let mut dst: LinkedHashMap<i32, &str> = [(9, "z")].into_iter().collect();
    dst.clone_from(&src);
    assert_eq!(dst, src);
    assert_eq!(keys(&dst), [3, 1]);
    assert!(!dst.contains_key(&9));
}

// Test: a caller-supplied hasher is used consistently.
#[test]
fn custom_hasher() {
    let mut m: LinkedHashMap<&str, i32, BuildHasherDefault<DefaultHasher>> =
        LinkedHashMap::default();
    m.extend([("one", 1), ("two", 2), ("three", 3)]);
    assert_eq!(m.get("two"), Some(&2));
    assert_eq!(m.remove("one"), Some(1));
    assert_eq!(keys(&m), ["two", "three"]);
    let cloned = m.clone();
    assert_eq!(cloned.get("three"), Some(&3));
}

// Test: owned and borrowed iteration orders agree.
#[test]
fn into_iter_matches_iter() {
    let m: LinkedHashMap<u8, char> = (b'a'..=b'f').map(|b| (b, b as char)).collect();
    let borrowed: Vec<(u8, char)> = m.iter().map(|(k, v)| (*k, *v)).collect();
    let owned: Vec<(u8, char)> = m.into_iter().collect();
    assert_eq!(borrowed, owned);
}

// Test: the map can move across threads under external synchronization.
#[test]
fn map_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LinkedHashMap<String, Vec<u8>>>();

    let m = std::sync::Mutex::new(LinkedHashMap::new());
    std::thread::scope(|s| {
        for t in 0..4 {
            let m = &m;
            s.spawn(move || {
                m.lock().unwrap().insert(t, t);
            });
        }
    });
    assert_eq!(m.lock().unwrap().len(), 4);
}
