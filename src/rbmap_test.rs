use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::*;

use std::{
    cell::Cell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

#[test]
fn test_rbmap() {
    let seed: u64 = random();
    // let seed: u64 = 10761478343208137261;
    println!("test_rbmap {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index: RbMap<u8, u64> = RbMap::new();
    let mut btmap: BTreeMap<u8, u64> = BTreeMap::new();

    let mut counts = [0_usize; 10];

    for _i in 0..200_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op = uns.arbitrary().unwrap();
        // println!("op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btmap.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btmap.is_empty());
            }
            Op::Insert(key, val) => {
                counts[2] += 1;
                index.insert(key, val).unwrap();
                btmap.insert(key, val);
                assert_eq!(index.get(&key), Some(&val), "for key {}", key);
            }
            Op::Set(key, val) => {
                counts[3] += 1;
                match (index.set(key, val).unwrap(), btmap.insert(key, val)) {
                    (None, None) => (),
                    (Some(v), Some(r)) => assert_eq!(v, r, "for key {}", key),
                    (None, Some(_)) => panic!("set no key {} in rbmap", key),
                    (Some(_), None) => panic!("set no key {} in btree", key),
                }
            }
            Op::Remove(key) => {
                counts[4] += 1;
                match (index.remove(&key), btmap.remove(&key)) {
                    (None, None) => (),
                    (Some(v), Some(r)) => assert_eq!(v, r, "for key {}", key),
                    (None, Some(_)) => panic!("remove no key {} in rbmap", key),
                    (Some(_), None) => panic!("remove no key {} in btree", key),
                }
                assert_eq!(index.get(&key), None);
            }
            Op::Validate => {
                counts[5] += 1;
                index.validate().unwrap();
            }
            Op::Get(key) => {
                counts[6] += 1;
                assert_eq!(index.get(&key), btmap.get(&key), "for key {}", key);
            }
            Op::GetKeyValue(key) => {
                counts[7] += 1;
                assert_eq!(index.get_key_value(&key), btmap.get_key_value(&key));
            }
            Op::Iter => {
                counts[8] += 1;
                let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
                let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(a, b);
            }
            Op::Extend(items) => {
                counts[9] += 1;
                index.extend(items.clone());
                btmap.extend(items.clone())
            }
        }
    }

    index.validate().unwrap();
    let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let b: Vec<(u8, u64)> = btmap.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(a, b);

    println!("counts {:?} len:{}/{}", counts, index.len(), btmap.len());
}

#[derive(Debug, Arbitrary)]
enum Op {
    Len,
    IsEmpty,
    Insert(u8, u64),
    Set(u8, u64),
    Remove(u8),
    Validate,
    Get(u8),
    GetKeyValue(u8),
    Iter,
    Extend(Vec<(u8, u64)>),
}

// recursive in-order walk, used as reference for the parent-link cursor.
fn walk<'a, K, V>(arena: &'a Arena<K, V>, link: Link, acc: &mut Vec<&'a K>) {
    if let Some(off) = link {
        let node = arena.node(off);
        walk(arena, node.left, acc);
        acc.push(&node.key);
        walk(arena, node.right, acc);
    }
}

#[test]
fn test_rbmap_iter_walk() {
    let seed: u64 = random();
    println!("test_rbmap_iter_walk {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index: RbMap<u16, u16> = RbMap::new();
    for round in 0..20 {
        for _i in 0..500 {
            let key = rng.gen::<u16>() % 2048;
            if rng.gen::<bool>() {
                index.insert(key, round).unwrap();
            } else {
                index.remove(&key);
            }
        }

        let mut refs = vec![];
        walk(&index.arena, index.root, &mut refs);
        let keys: Vec<&u16> = index.keys().collect();
        assert_eq!(keys, refs, "round {}", round);

        // strictly ascending, no duplicates.
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys.len(), index.len());
    }
}

#[test]
fn test_rbmap_iter_order() {
    let mut index: RbMap<&str, u32> = RbMap::new();
    for (i, key) in ["A", "E", "D", "C", "B"].iter().enumerate() {
        index.insert(*key, (i as u32) + 1).unwrap();
        index.validate().unwrap();
    }
    assert_eq!(index.len(), 5);

    let items: Vec<(&str, u32)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let refs = vec![("A", 1), ("B", 5), ("C", 4), ("D", 3), ("E", 2)];
    assert_eq!(items, refs);
}

#[test]
fn test_rbmap_update() {
    let mut index: RbMap<String, u32> = RbMap::new();
    index.insert("A".to_string(), 1).unwrap();
    index.insert("A".to_string(), 99).unwrap();

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("A"), Some(&99));
    assert_eq!(index.set("A".to_string(), 100).unwrap(), Some(99));
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("A"), Some(&100));
    index.validate().unwrap();
}

#[test]
fn test_rbmap_remove_half() {
    let seed: u64 = random();
    println!("test_rbmap_remove_half {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut keys: BTreeSet<i64> = BTreeSet::new();
    while keys.len() < 1000 {
        keys.insert(rng.gen::<i64>());
    }

    let mut index: RbMap<i64, i64> = RbMap::new();
    for key in keys.iter() {
        index.insert(*key, key.wrapping_mul(3)).unwrap();
    }
    assert_eq!(index.len(), 1000);
    index.validate().unwrap();

    let mut shuffled: Vec<i64> = keys.iter().copied().collect();
    shuffled.shuffle(&mut rng);
    let (removed, kept) = shuffled.split_at(500);

    for key in removed.iter() {
        assert_eq!(index.remove(key), Some(key.wrapping_mul(3)));
        assert_eq!(index.get(key), None);
    }
    index.validate().unwrap();
    assert_eq!(index.len(), 500);

    let mut refs: Vec<i64> = kept.to_vec();
    refs.sort_unstable();
    let items: Vec<i64> = index.keys().copied().collect();
    assert_eq!(items, refs);
    for key in kept.iter() {
        assert_eq!(index.get(key), Some(&key.wrapping_mul(3)));
    }
}

#[test]
fn test_rbmap_drain_any_order() {
    let seed: u64 = random();
    println!("test_rbmap_drain_any_order {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    for n in [0_u32, 1, 2, 3, 7, 64, 1000].iter() {
        let mut index: RbMap<u32, u32> = (0..*n).map(|k| (k, k + 1)).collect();
        assert_eq!(index.len(), *n as usize);

        let mut keys: Vec<u32> = (0..*n).collect();
        keys.shuffle(&mut rng);
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(index.remove(key), Some(key + 1));
            assert_eq!(index.len(), (*n as usize) - i - 1);
            index.validate().unwrap();
        }

        assert!(index.is_empty());
        assert_eq!(index.iter().next(), None);
    }
}

#[test]
fn test_rbmap_sequential() {
    let mut index: RbMap<u32, u32> = RbMap::new();
    for key in 0..4096 {
        index.insert(key, key).unwrap();
    }
    index.validate().unwrap();
    for key in (0..4096).rev().step_by(2) {
        assert_eq!(index.remove(&key), Some(key));
    }
    index.validate().unwrap();

    let items: Vec<u32> = index.keys().copied().collect();
    let refs: Vec<u32> = (0..4096).step_by(2).collect();
    assert_eq!(items, refs);
}

#[test]
fn test_rbmap_remove_missing() {
    let mut index: RbMap<u32, u32> = (0..100).map(|k| (k * 2, k)).collect();
    let before: Vec<(u32, u32)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    let root = index.root;

    assert_eq!(index.remove(&1), None);
    assert_eq!(index.remove(&1000), None);

    assert_eq!(index.len(), 100);
    assert_eq!(index.root, root);
    let after: Vec<(u32, u32)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(before, after);
    index.validate().unwrap();

    let mut empty: RbMap<u32, u32> = RbMap::new();
    assert_eq!(empty.remove(&1), None);
    assert!(empty.is_empty());
}

#[test]
fn test_rbmap_read_api() {
    let mut index: RbMap<String, Vec<u32>> = RbMap::new();
    index.insert("a021be".to_string(), vec![]).unwrap();
    index.insert("92b341".to_string(), vec![]).unwrap();
    index.insert("1bf2e0".to_string(), vec![]).unwrap();

    for (i, key) in ["a021be", "92b341", "1bf2e0"].iter().enumerate() {
        index.get_mut(*key).unwrap().push(i as u32);
    }
    assert_eq!(index.get("92b341"), Some(&vec![1]));
    assert_eq!(index.get_mut("missing"), None);

    let (key, value) = index.get_key_value("1bf2e0").unwrap();
    assert_eq!(key, "1bf2e0");
    assert_eq!(value, &vec![2]);

    assert!(index.contains_key("a021be"));
    assert!(!index.contains_key("a021bf"));

    let keys: Vec<&String> = index.keys().collect();
    assert_eq!(keys, vec!["1bf2e0", "92b341", "a021be"]);
    let values: Vec<&Vec<u32>> = index.values().collect();
    assert_eq!(values, vec![&vec![2], &vec![1], &vec![0]]);

    assert_eq!(
        format!("{:?}", index),
        r#"{"1bf2e0": [2], "92b341": [1], "a021be": [0]}"#
    );
}

#[test]
fn test_rbmap_clear() {
    let mut index: RbMap<u16, u16> = (0..500).map(|k| (k, k)).collect();
    index.clear();
    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
    assert_eq!(index.iter().count(), 0);
    index.validate().unwrap();

    for key in (0..100).rev() {
        index.insert(key, key * 2).unwrap();
    }
    index.validate().unwrap();
    assert_eq!(index.len(), 100);
    assert_eq!(index.get(&42), Some(&84));
}

#[test]
fn test_rbmap_validate_broken() {
    let mut index: RbMap<u32, u32> = (0..32).map(|k| (k, k)).collect();
    index.validate().unwrap();

    let root = index.root.unwrap();
    index.arena.node_mut(root).set_red();
    assert!(index.validate().is_err());
    index.arena.node_mut(root).set_black();
    index.validate().unwrap();

    index.n_count += 1;
    match index.validate() {
        Err(Error::Fatal(_, msg)) => assert!(msg.contains("count"), "{}", msg),
        res => panic!("unexpected {:?}", res),
    }
}

#[derive(Debug)]
struct Counted {
    val: u32,
    drops: Rc<Cell<usize>>,
}

impl Counted {
    fn new(val: u32, drops: &Rc<Cell<usize>>) -> Counted {
        Counted {
            val,
            drops: Rc::clone(drops),
        }
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_rbmap_drops() {
    let key_drops = Rc::new(Cell::new(0));
    let val_drops = Rc::new(Cell::new(0));

    let mut index: RbMap<u32, Counted> = RbMap::new();
    for key in 0..100 {
        index.insert(key, Counted::new(key, &val_drops)).unwrap();
    }
    assert_eq!(val_drops.get(), 0);

    // update drops the old value exactly once.
    index.insert(7, Counted::new(700, &val_drops)).unwrap();
    assert_eq!(val_drops.get(), 1);
    assert_eq!(index.get(&7).map(|c| c.val), Some(700));
    assert_eq!(index.len(), 100);

    // set hands the old value back instead.
    let old = index.set(8, Counted::new(800, &val_drops)).unwrap().unwrap();
    assert_eq!(old.val, 8);
    assert_eq!(val_drops.get(), 1);
    drop(old);
    assert_eq!(val_drops.get(), 2);

    // remove hands the value back.
    for key in 0..10 {
        let value = index.remove(&key).unwrap();
        assert_eq!(value.val, if key < 7 || key > 8 { key } else { key * 100 });
    }
    assert_eq!(val_drops.get(), 12);

    index.clear();
    assert_eq!(val_drops.get(), 102);

    let mut index: RbMap<Counted, u32> = RbMap::new();
    index.insert(Counted::new(1, &key_drops), 1).unwrap();
    index.insert(Counted::new(2, &key_drops), 2).unwrap();
    index.insert(Counted::new(3, &key_drops), 3).unwrap();
    // equal key is not stored, the argument is dropped.
    index.insert(Counted::new(2, &key_drops), 20).unwrap();
    assert_eq!(key_drops.get(), 1);
    drop(index);
    assert_eq!(key_drops.get(), 4);
}

impl PartialEq for Counted {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl Eq for Counted {}

impl PartialOrd for Counted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Counted {
    fn cmp(&self, other: &Self) -> Ordering {
        self.val.cmp(&other.val)
    }
}
