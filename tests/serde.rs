#![cfg(feature = "serde")]

use flatmap::{FlatMap, Greater, KeyValue};

#[test]
fn serializes_in_key_order() {
    let map: FlatMap<String, u32> = [("b".to_string(), 2), ("a".to_string(), 1)].into();
    assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"a":1,"b":2}"#);
}

#[test]
fn deserializes_unsorted_input() {
    let map: FlatMap<String, u32> = serde_json::from_str(r#"{"z":26,"a":1,"m":13}"#).unwrap();
    assert_eq!(map.keys().map(String::as_str).collect::<Vec<_>>(), ["a", "m", "z"]);
    assert_eq!(map.check_order(), Ok(()));
}

#[test]
fn last_duplicate_wins() {
    let map: FlatMap<String, u32> = serde_json::from_str(r#"{"k":1,"k":2}"#).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("k"), Some(&2));
}

#[test]
fn honours_comparator() {
    let map: FlatMap<u8, bool, Vec<KeyValue<u8, bool>>, Greater> =
        serde_json::from_str(r#"{"1":true,"3":false,"2":true}"#).unwrap();
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
    assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"3":false,"2":true,"1":true}"#);
}
