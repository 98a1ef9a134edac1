//! Tests for sub_map and copy: snapshots that do not share top-level storage.

use std::collections::HashMap;

use navmap::{NavMap, Navigable, StoreKind, Value};

use crate::helpers::fixture_map;

#[test]
fn test_sub_map_of_keys() {
    let map = fixture_map().map;
    let list_coll = map.sub_map(["list", "coll"]).unwrap();

    assert_eq!(list_coll.len(), 2);
    assert!(list_coll.valued("list"));
    assert!(list_coll.valued("coll"));
}

#[test]
fn test_sub_map_of_collection_of_keys() {
    let map = fixture_map().map;
    let keys = vec!["list".to_string(), "coll".to_string(), "nonexistent".to_string()];
    let list_coll = map.sub_map(&keys).unwrap();

    // only valued keys make it into the derived map
    assert_eq!(list_coll.len(), 2);
    assert!(list_coll.not_valued("nonexistent"));
}

#[test]
fn test_sub_map_with_explicit_store() {
    let map = fixture_map().map;
    let list_coll = map.sub_map_in(StoreKind::Ordered.create(), ["list", "coll"]);

    assert_eq!(list_coll.len(), 2);
    assert_eq!(list_coll.raw().kind(), "ordered");
    assert_eq!(list_coll.keys(), vec!["coll", "list"]);
}

#[test]
fn test_sub_map_with_explicit_seeded_store() {
    let map = fixture_map().map;
    let mut seeded = HashMap::new();
    seeded.insert("extra".to_string(), Value::from(1));

    let sub = map.sub_map_in(Box::new(seeded), vec!["key1"]);
    assert_eq!(sub.len(), 2);
    assert!(sub.valued("extra"));
}

#[test]
fn test_sub_map_is_independent_of_source() {
    let map = fixture_map().map;
    let sub = map.sub_map(["key1", "key2"]).unwrap();

    sub.del(["key1"]).add("key2", "changed");
    assert!(map.valued("key1"));
    assert_eq!(map.text("key2").unwrap().as_deref(), Some("string2"));
}

#[test]
fn test_empty_sub_map() {
    let map = fixture_map().map;
    let empty = map.sub_map(Vec::<&str>::new()).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_copy() {
    let map = fixture_map().map;
    let copy = map.copy();

    for key in map.keys() {
        assert!(copy.valued(&key), "copy is missing {key}");
        assert!(map.valued(&key));
    }

    copy.rename_key("key1", "key one");
    assert!(copy.not_valued("key1"));
    assert!(copy.valued("key one"));

    assert!(map.valued("key1"));
    assert!(map.not_valued("key one"));
}

#[test]
fn test_copy_is_shallow() {
    let fixture = fixture_map();
    let copy = fixture.map.copy();

    // nested maps are shared between the source and the copy
    copy.map("submap").unwrap().unwrap().add("shared", true);
    assert!(fixture.submap.valued("shared"));

    // top level mutations are not
    copy.add("only_in_copy", 1);
    assert!(fixture.map.not_valued("only_in_copy"));
}

#[test]
fn test_copy_keeps_store_kind() {
    let map = NavMap::with_kind(StoreKind::Insertion)
        .with("z", 1)
        .with("a", 2);
    let copy = map.copy();

    assert_eq!(copy.raw().kind(), "insertion");
    assert_eq!(copy.keys(), vec!["z", "a"]);
    assert_eq!(copy, map);
}
