#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use std::ops::Bound;

use std::collections::BTreeMap as BeeMap;
use flatmap::{FlatMap, Placement, SmallFlatMap};

type TestMap = SmallFlatMap<u8, u8, 8>;

#[derive(Debug, Arbitrary)]
enum Command {
    Append { other: Vec<(u8, u8)> },
    Clear,
    Reset,
    ContainsKey { key: u8 },
    FirstGe { key: u8 },
    Find { key: u8 },
    FindIndex { key: u8 },
    FirstKeyValue,
    Get { key: u8 },
    GetOr { key: u8, default: u8 },
    GetIndex { index: usize },
    GetMut { key: u8, value: u8 },
    GetOrInsertDefault { key: u8 },
    Set { key: u8, value: u8 },
    AddIfNew { key: u8, value: u8 },
    Insert { key: u8, value: u8 },
    InsertAt { key: u8, value: u8 },
    TryInsertAt { pos: usize, key: u8, value: u8 },
    Iter,
    Keys,
    LastKeyValue,
    Len,
    PopFirst,
    PopLast,
    Range { start: MyBound, end: MyBound },
    RangeMut { start: MyBound, end: MyBound },
    Remove { key: u8 },
    RemoveFull { key: u8 },
    RemoveIndex { index: usize },
    Reserve { additional: u8 },
    Retain { threshold: u8 },
    SplitOff { key: u8 },
    Swap { other: Vec<(u8, u8)> },
    Values,
    ValuesMut,
    Clone,
}

#[derive(Debug, Arbitrary)]
enum MyBound {
    Included(u8),
    Excluded(u8),
    Unbounded,
}

impl From<MyBound> for Bound<u8> {
    fn from(b: MyBound) -> Self {
        match b {
            MyBound::Included(x) => Bound::Included(x),
            MyBound::Excluded(x) => Bound::Excluded(x),
            MyBound::Unbounded => Bound::Unbounded,
        }
    }
}

fn validate_bounds(start: Bound<u8>, end: Bound<u8>) -> bool {
    match (start, end) {
        (Bound::Excluded(s), Bound::Excluded(e)) if s == e => {false},
        (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e)) if s > e => {false},
        _ => {true},
    }
}

fn build(pairs: Vec<(u8, u8)>) -> (TestMap, BeeMap<u8, u8>) {
    let mut map = TestMap::default();
    let mut btree = BeeMap::new();
    for (k, v) in pairs {
        map.set(k, v);
        btree.insert(k, v);
    }
    (map, btree)
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let commands = match Vec::<Command>::arbitrary(&mut unstructured) {
        Ok(c) => c,
        Err(_) => return,
    };

    let mut map = TestMap::default();
    let mut btree_map: BeeMap<u8, u8> = BeeMap::new();
    let mut cloned_map;

    for command in commands {
        map.check_order().unwrap();

        if std::env::var("RUST_BACKTRACE").is_ok() {
            println!("{command:?}");
        }

        match command {
            Command::Append { other } => {
                let (mut other_map, other_btree) = build(other);
                map.append(&mut other_map);
                assert!(other_map.is_empty());
                btree_map.extend(other_btree);
            }
            Command::Clear => {
                map.clear();
                btree_map.clear();
                assert_eq!(map.len(), 0);
            }
            Command::Reset => {
                map.reset();
                btree_map.clear();
                assert!(!map.backing().spilled());
            }
            Command::ContainsKey { key } => {
                assert_eq!(map.contains_key(&key), btree_map.contains_key(&key));
            }
            Command::FirstGe { key } => {
                assert_eq!(map.first_ge(&key), btree_map.range(..key).count());
            }
            Command::Find { key } => {
                assert_eq!(
                    map.find(&key).map(|kv| kv.pair()),
                    btree_map.get_key_value(&key)
                );
            }
            Command::FindIndex { key } => {
                let expected = btree_map.contains_key(&key).then(|| btree_map.range(..key).count());
                assert_eq!(map.find_index(&key), expected);
            }
            Command::FirstKeyValue => {
                assert_eq!(map.first_key_value(), btree_map.first_key_value());
            }
            Command::Get { key } => {
                assert_eq!(map.get(&key), btree_map.get(&key));
            }
            Command::GetOr { key, default } => {
                let len = map.len();
                assert_eq!(map.get_or(&key, default), *btree_map.get(&key).unwrap_or(&default));
                assert_eq!(map.len(), len);
            }
            Command::GetIndex { index } => {
                assert_eq!(map.get_index(index), btree_map.iter().nth(index));
            }
            Command::GetMut { key, value } => {
                let mut had = false;
                if let Some(v) = map.get_mut(&key) {
                    *v = value;
                    had = true;
                }
                if let Some(v) = btree_map.get_mut(&key) {
                    *v = value;
                    assert!(had);
                } else {
                    assert!(!had);
                }
            }
            Command::GetOrInsertDefault { key } => {
                let v = map.get_or_insert_default(key);
                *v = v.wrapping_add(1);
                let v = btree_map.entry(key).or_default();
                *v = v.wrapping_add(1);
            }
            Command::Set { key, value } => {
                let placement = map.set(key, value);
                let was_new = btree_map.insert(key, value).is_none();
                assert_eq!(placement.is_inserted(), was_new);
                assert_eq!(placement.index(), btree_map.range(..key).count());
            }
            Command::AddIfNew { key, value } => {
                let was_new = !btree_map.contains_key(&key);
                btree_map.entry(key).or_insert(value);
                let expected_pos = btree_map.range(..key).count();
                let expected = if was_new {
                    Placement::Inserted(expected_pos)
                } else {
                    Placement::Existing(expected_pos)
                };
                assert_eq!(map.add_if_new(key, value), expected);
            }
            Command::Insert { key, value } => {
                assert_eq!(map.insert(key, value), btree_map.insert(key, value));
            }
            Command::InsertAt { key, value } => {
                let pos = map.first_ge(&key);
                if map.get_index(pos).map(|(k, _)| *k) != Some(key) {
                    map.insert_at(pos, key, value);
                    assert!(btree_map.insert(key, value).is_none());
                }
            }
            Command::TryInsertAt { pos, key, value } => {
                let pos = pos % (map.len() + 2);
                let fits = pos == btree_map.range(..key).count() && !btree_map.contains_key(&key);
                assert_eq!(map.try_insert_at(pos, key, value).is_ok(), fits);
                if fits {
                    btree_map.insert(key, value);
                }
            }
            Command::Iter => {
                assert!(map.iter().eq(btree_map.iter()));
                assert!(map.iter().rev().eq(btree_map.iter().rev()));
            }
            Command::Keys => {
                assert!(map.keys().eq(btree_map.keys()));
            }
            Command::LastKeyValue => {
                assert_eq!(map.last_key_value(), btree_map.last_key_value());
            }
            Command::Len => {
                assert_eq!(map.len(), btree_map.len());
                assert_eq!(map.is_empty(), btree_map.is_empty());
            }
            Command::PopFirst => {
                assert_eq!(map.pop_first(), btree_map.pop_first());
            }
            Command::PopLast => {
                assert_eq!(map.pop_last(), btree_map.pop_last());
            }
            Command::Range { start, end } => {
                let start: Bound<u8> = start.into();
                let end: Bound<u8> = end.into();
                if !validate_bounds(start, end) {continue;}

                let map_range: Vec<_> = map.range((start, end)).collect();
                let btree_range: Vec<_> = btree_map.range((start, end)).collect();
                assert_eq!(map_range, btree_range);
            }
            Command::RangeMut { start, end } => {
                let start: Bound<u8> = start.into();
                let end: Bound<u8> = end.into();
                if !validate_bounds(start, end) {continue;}

                map.range_mut((start, end)).for_each(|(_, v)| *v = v.wrapping_add(1));
                btree_map.range_mut((start, end)).for_each(|(_, v)| *v = v.wrapping_add(1));
            }
            Command::Remove { key } => {
                assert_eq!(map.remove(&key), btree_map.remove(&key));
            }
            Command::RemoveFull { key } => {
                let len = map.len();
                let expected_pos = btree_map.range(..key).count();
                match map.remove_full(&key) {
                    Ok((pos, kv)) => {
                        assert_eq!(pos, expected_pos);
                        assert_eq!(Some(kv.into_pair()), btree_map.remove_entry(&key));
                    }
                    Err(pos) => {
                        assert_eq!(pos, expected_pos);
                        assert!(!btree_map.contains_key(&key));
                        assert_eq!(map.len(), len);
                    }
                }
            }
            Command::RemoveIndex { index } => {
                if index < map.len() {
                    let (k, v) = map.remove_index(index).into_pair();
                    let btree_key = btree_map.keys().nth(index).copied();
                    assert_eq!(Some(k), btree_key);
                    assert_eq!(Some(v), btree_map.remove(&k));
                }
            }
            Command::Reserve { additional } => {
                map.reserve(additional as usize);
                assert!(map.capacity() >= map.len() + additional as usize);
            }
            Command::Retain { threshold } => {
                map.retain(|k, _| *k <= threshold);
                btree_map.retain(|k, _| *k <= threshold);
            }
            Command::SplitOff { key } => {
                let map_split = map.split_off(&key);
                let btree_split = btree_map.split_off(&key);
                assert!(map_split.iter().eq(btree_split.iter()));
                map_split.check_order().unwrap();
            }
            Command::Swap { other } => {
                let (mut other_map, mut other_btree) = build(other);
                map.swap(&mut other_map);
                std::mem::swap(&mut btree_map, &mut other_btree);
                assert!(other_map.iter().eq(other_btree.iter()));
            }
            Command::Values => {
                assert!(map.values().eq(btree_map.values()));
            }
            Command::ValuesMut => {
                map.values_mut().for_each(|v| *v = v.wrapping_add(1));
                btree_map.values_mut().for_each(|v| *v = v.wrapping_add(1));
            }
            Command::Clone => {
                cloned_map = map.clone();
                let cloned_btree = btree_map.clone();
                assert!(cloned_map.iter().eq(map.iter()));
                assert!(cloned_btree.iter().eq(btree_map.iter()));
            }
        }

        // Final consistency check
        let map_contents: Vec<_> = map.iter().collect();
        let btree_contents: Vec<_> = btree_map.iter().collect();
        assert_eq!(map_contents, btree_contents);
    }

    let mut roundtrip = FlatMap::new();
    roundtrip.extend(map.into_iter());
    assert!(roundtrip.into_iter().eq(btree_map.into_iter()));
});
