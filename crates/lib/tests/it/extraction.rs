//! Tests for typed extraction, defaults, collections and streams.

use std::{
    collections::{BTreeSet, HashSet, LinkedList},
    sync::Arc,
};

use chrono::Utc;
use navmap::{NavMap, Navigable, Value};

use crate::helpers::{Something, fixture_map};

#[test]
fn test_valued_and_not_valued() {
    let map = fixture_map().map;
    assert!(map.valued("key1"));
    assert!(!map.not_valued("key1"));
    assert!(!map.valued("nonexistent"));
    assert!(map.not_valued("nonexistent"));
}

#[test]
fn test_long() {
    let map = fixture_map().map;
    assert_eq!(map.long("long").unwrap(), i64::MAX);
    assert_eq!(map.long_or("long1", 1).unwrap(), 1);

    let err = map.long("non existent").unwrap_err();
    assert!(err.is_missing_value());
    assert_eq!(err.key(), Some("non existent"));
}

#[test]
fn test_int() {
    let map = fixture_map().map;
    assert_eq!(map.int("int").unwrap(), i32::MAX);
    assert_eq!(map.int_or("int1", 1).unwrap(), 1);
    assert!(map.int("non existent").unwrap_err().is_missing_value());
}

#[test]
fn test_double() {
    let map = fixture_map().map;
    assert_eq!(map.double("double").unwrap(), f64::MAX);
    assert_eq!(map.double_or("double1", 1.1).unwrap(), 1.1);
    assert!(map.double("non existent").unwrap_err().is_missing_value());
}

#[test]
fn test_float() {
    let map = fixture_map().map;
    assert_eq!(map.float("float").unwrap(), f32::MAX);
    assert_eq!(map.float_or("float1", 1.1).unwrap(), 1.1);
    assert!(map.float("non existent").unwrap_err().is_missing_value());
}

#[test]
fn test_boolean() {
    let map = fixture_map().map;
    assert!(map.boolean("boolean").unwrap());
    assert!(map.boolean_or("boolean1", true).unwrap());
    assert!(map.boolean("non existent").unwrap_err().is_missing_value());
}

#[test]
fn test_text() {
    let map = fixture_map().map;
    assert_eq!(map.text("key1").unwrap().as_deref(), Some("string1"));
    assert_eq!(map.text("key2").unwrap().as_deref(), Some("string2"));
    assert!(map.text("key3").unwrap().is_none());
    assert_eq!(map.text_or("key3", "string3").unwrap(), "string3");
}

#[test]
fn test_timestamp() {
    let fixture = fixture_map();
    let map = fixture.map;
    assert_eq!(map.timestamp("date").unwrap(), Some(fixture.date));
    assert!(map.timestamp("date1").unwrap().is_none());

    let now = Utc::now();
    assert_eq!(map.timestamp_or("date1", now).unwrap(), now);
}

#[test]
fn test_no_coercion_between_kinds() {
    let map = NavMap::new()
        .with("answer", "42")
        .with("small", 1)
        .with("wide", 1i64);

    assert!(map.int("answer").unwrap_err().is_type_mismatch());
    assert!(map.long("small").unwrap_err().is_type_mismatch());
    assert!(map.int("wide").unwrap_err().is_type_mismatch());
    // the default is only used when the key is not valued
    assert!(map.int_or("answer", 0).unwrap_err().is_type_mismatch());
    assert!(map.text("small").unwrap_err().is_type_mismatch());
}

#[test]
fn test_object() {
    let fixture = fixture_map();
    let map = fixture.map;
    let something_else = Arc::new(Something(8));

    let found = map
        .object_or("object", something_else.clone())
        .unwrap();
    assert!(Arc::ptr_eq(&found, &fixture.something));

    assert!(map.object::<Arc<Something>>("object1").unwrap().is_none());
    let fallback = map
        .object_or("object1", something_else.clone())
        .unwrap();
    assert!(Arc::ptr_eq(&fallback, &something_else));

    // a different type is a mismatch, not a silent None
    assert!(map.object::<Arc<String>>("object").is_err());
}

#[test]
fn test_object_round_trips_raw_value() {
    let fixture = fixture_map();
    let value = fixture.map.object::<Value>("simpleMap").unwrap().unwrap();
    assert_eq!(value, fixture.simple_map);
}

#[test]
fn test_object_with_transform() {
    let map = fixture_map().map;

    let len = map.object_with("key1", |value| value.map(|v| v.to_string().len()));
    assert_eq!(len, Some(7));
    let absent = map.object_with("missing", |value| value.is_none());
    assert!(absent);

    let upper = map.object_with_or("key1", |v| v.to_string().to_uppercase(), String::new());
    assert_eq!(upper, "STRING1");
    let fallback = map.object_with_or("missing", |v| v.to_string(), "none".to_string());
    assert_eq!(fallback, "none");
}

#[test]
fn test_collection() {
    let map = fixture_map().map;

    let coll = map.collection::<String, HashSet<String>>("coll").unwrap().unwrap();
    let expected: HashSet<String> = ["3", "4", "5", "6"].iter().map(|s| s.to_string()).collect();
    assert_eq!(coll, expected);

    let sorted = map.collection::<String, BTreeSet<String>>("coll").unwrap().unwrap();
    assert_eq!(
        sorted.into_iter().collect::<Vec<_>>(),
        vec!["3", "4", "5", "6"]
    );

    assert!(map.collection::<String, HashSet<String>>("coll1").unwrap().is_none());
    let default: LinkedList<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    let got = map.collection_or::<String, _>("coll1", default.clone()).unwrap();
    assert_eq!(got, default);
}

#[test]
fn test_list() {
    let map = fixture_map().map;

    let list: Vec<i32> = map.list("list").unwrap().unwrap();
    assert_eq!(list, vec![1, 2, 3]);

    assert!(map.list::<i32>("list1").unwrap().is_none());
    assert_eq!(map.list_or("list1", vec![4, 5]).unwrap(), vec![4, 5]);

    // every element is checked
    assert!(map.list::<String>("list").unwrap_err().is_type_mismatch());
}

#[test]
fn test_stream() {
    let map = fixture_map().map;

    let all: Vec<i32> = map.stream("list").unwrap().collect();
    assert_eq!(all, vec![1, 2, 3]);

    // each call derives a fresh sequence
    let evens: Vec<i32> = map.stream::<i32>("list").unwrap().filter(|n| n % 2 == 0).collect();
    assert_eq!(evens, vec![2]);

    let err = map.stream::<i32>("nonexistent").err().unwrap();
    assert!(err.is_missing_value());

    let from_collection: Vec<i32> = map.stream_or("nonexistent", vec![1, 2, 3]).unwrap().collect();
    assert_eq!(from_collection, vec![1, 2, 3]);

    let from_iterator: Vec<i32> = map.stream_or("nonexistent", 7..9).unwrap().collect();
    assert_eq!(from_iterator, vec![7, 8]);
}

#[test]
fn test_present_scenario() {
    let map = NavMap::of("name", "John");
    assert_eq!(map.int_or("age", 30).unwrap(), 30);
    assert!(map.int("age").unwrap_err().is_missing_value());

    let tags = NavMap::of("tags", vec!["a", "b", "c"]);
    assert_eq!(tags.list::<String>("tags").unwrap().unwrap(), vec!["a", "b", "c"]);
}
