use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, TimeZone, Utc};
use navmap::{NavMap, Navigable, Value};

/// An arbitrary caller type stored opaquely
#[derive(Debug, PartialEq)]
pub struct Something(pub u32);

/// Values seeded into [`fixture_map`], exposed so tests can compare against them
pub struct Fixture {
    pub map: NavMap,
    pub submap: NavMap,
    pub simple_map: Value,
    pub something: Arc<Something>,
    pub date: DateTime<Utc>,
}

pub fn fixed_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 2, 29, 12, 30, 0).unwrap()
}

/// Creates the shared test map:
/// thirteen valued keys covering every value kind plus a nested map and a
/// nested plain map
pub fn fixture_map() -> Fixture {
    let something = Arc::new(Something(7));
    let submap = NavMap::new().with("key1", "hello").with("key2", 42);
    let simple_map = Value::from(HashMap::<String, Value>::new());
    let date = fixed_date();

    let map = NavMap::new();
    map.add("key1", "string1")
        .add("key2", "string2")
        .add("list", vec![1, 2, 3])
        .add("coll", vec!["3", "4", "5", "6"])
        .add("int", i32::MAX)
        .add("long", i64::MAX)
        .add("double", f64::MAX)
        .add("float", f32::MAX)
        .add("boolean", true)
        .add("date", date)
        .add("object", Value::Object(navmap::Opaque::from_arc(something.clone())))
        .add("submap", submap.clone())
        .add("simpleMap", simple_map.clone());

    Fixture {
        map,
        submap,
        simple_map,
        something,
        date,
    }
}

/// A plain source map for bulk operations
pub fn plain(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
