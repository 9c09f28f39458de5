use std::collections::BTreeMap;

use flatmap::{FlatMap, Placement};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Set(u8, u16),
    AddIfNew(u8, u16),
    Insert(u8, u16),
    InsertAtFound(u8, u16),
    GetOrInsertDefault(u8),
    Remove(u8),
    RemoveIndex(usize),
    Retain(u8),
    Clear,
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::Set(k, v)),
        2 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::AddIfNew(k, v)),
        2 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Op::InsertAtFound(k, v)),
        1 => any::<u8>().prop_map(Op::GetOrInsertDefault),
        3 => any::<u8>().prop_map(Op::Remove),
        1 => any::<usize>().prop_map(Op::RemoveIndex),
        1 => any::<u8>().prop_map(Op::Retain),
        1 => Just(Op::Clear),
        1 => Just(Op::Reset),
    ]
}

fn apply(map: &mut FlatMap<u8, u16>, model: &mut BTreeMap<u8, u16>, op: Op) {
    match op {
        Op::Set(k, v) => {
            let placement = map.set(k, v);
            let was_new = model.insert(k, v).is_none();
            assert_eq!(placement.is_inserted(), was_new);
            assert_eq!(placement.index(), model.range(..k).count());
            assert_eq!(map.get(&k), Some(&v));
        }
        Op::AddIfNew(k, v) => {
            let placement = map.add_if_new(k, v);
            let was_new = !model.contains_key(&k);
            model.entry(k).or_insert(v);
            assert_eq!(placement.is_inserted(), was_new);
            assert_eq!(placement.index(), model.range(..k).count());
        }
        Op::Insert(k, v) => {
            assert_eq!(map.insert(k, v), model.insert(k, v));
        }
        Op::InsertAtFound(k, v) => {
            let pos = map.first_ge(&k);
            if map.find_index(&k).is_none() {
                map.insert_at(pos, k, v);
                model.insert(k, v);
            }
        }
        Op::GetOrInsertDefault(k) => {
            let value = map.get_or_insert_default(k);
            *value = value.wrapping_add(1);
            let expected = model.entry(k).or_default();
            *expected = expected.wrapping_add(1);
        }
        Op::Remove(k) => {
            let before = map.len();
            let expected_pos = model.range(..k).count();
            match map.remove_full(&k) {
                Ok((pos, kv)) => {
                    assert_eq!(pos, expected_pos);
                    assert_eq!(Some(kv.value), model.remove(&k));
                    assert_eq!(map.len(), before - 1);
                }
                Err(pos) => {
                    assert_eq!(pos, expected_pos);
                    assert!(!model.contains_key(&k));
                    assert_eq!(map.len(), before);
                }
            }
            assert!(map.find(&k).is_none());
        }
        Op::RemoveIndex(index) => {
            if !map.is_empty() {
                let index = index % map.len();
                let (k, v) = map.remove_index(index).into_pair();
                assert_eq!(model.remove(&k), Some(v));
            }
        }
        Op::Retain(threshold) => {
            map.retain(|k, _| *k <= threshold);
            model.retain(|k, _| *k <= threshold);
        }
        Op::Clear => {
            map.clear();
            model.clear();
        }
        Op::Reset => {
            map.reset();
            model.clear();
        }
    }
}

proptest! {
    #[test]
    fn agrees_with_btreemap(ops in prop::collection::vec(op(), 0..200)) {
        let mut map = FlatMap::new();
        let mut model = BTreeMap::new();
        for op in ops {
            apply(&mut map, &mut model, op);
            prop_assert_eq!(map.check_order(), Ok(()));
            prop_assert_eq!(map.len(), model.len());
        }
        prop_assert!(map.iter().eq(model.iter()));
    }

    #[test]
    fn first_ge_counts_smaller_keys(
        keys in prop::collection::btree_set(any::<i16>(), 0..300),
        probe in any::<i16>(),
    ) {
        let map: FlatMap<i16, ()> = keys.iter().map(|&k| (k, ())).collect();
        let smaller = keys.range(..probe).count();
        prop_assert_eq!(map.first_ge(&probe), smaller);
        prop_assert_eq!(map.find_index(&probe), keys.contains(&probe).then_some(smaller));
    }

    #[test]
    fn lookups_see_last_written_value(
        writes in prop::collection::vec((0u8..32, any::<u32>()), 1..100),
        probe in 0u8..32,
    ) {
        let mut map = FlatMap::new();
        for &(k, v) in &writes {
            map.set(k, v);
        }
        let last = writes.iter().rev().find(|(k, _)| *k == probe).map(|&(_, v)| v);
        prop_assert_eq!(map.get(&probe).copied(), last);
        prop_assert_eq!(map.get_or(&probe, u32::MAX), last.unwrap_or(u32::MAX));
    }

    #[test]
    fn absent_remove_leaves_map_unchanged(
        keys in prop::collection::btree_set(0u8..100, 0..50),
        probe in 100u8..,
    ) {
        let mut map: FlatMap<u8, u8> = keys.iter().map(|&k| (k, k)).collect();
        let before = map.clone();
        prop_assert_eq!(map.remove(&probe), None);
        prop_assert_eq!(map, before);
    }

    #[test]
    fn range_matches_btreemap(
        keys in prop::collection::btree_set(any::<u8>(), 0..100),
        lo in any::<u8>(),
        hi in any::<u8>(),
    ) {
        prop_assume!(lo <= hi);
        let map: FlatMap<u8, ()> = keys.iter().map(|&k| (k, ())).collect();
        let model: BTreeMap<u8, ()> = keys.iter().map(|&k| (k, ())).collect();
        prop_assert!(map.range(lo..hi).eq(model.range(lo..hi)));
        prop_assert!(map.range(lo..=hi).eq(model.range(lo..=hi)));
    }
}

#[test]
fn scenario_get_with_default_does_not_mutate() {
    let mut map = FlatMap::new();
    map.set(1, "one");
    assert_eq!(map.get_or(&99, "default"), "default");
    assert_eq!(map.len(), 1);
    assert_eq!(map.set(1, "uno"), Placement::Existing(0));
}
