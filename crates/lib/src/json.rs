//! Bridging to `serde_json`.
//!
//! Decoding text is left to the caller. This module only turns an already
//! decoded [`serde_json::Value`] into a [`Value`] tree (and back out as JSON):
//!
//! ```
//! use navmap::{NavMap, Navigable};
//!
//! let json = serde_json::json!({
//!     "name": "John",
//!     "friends": [{"name": "Jane"}, {"name": "Joe"}]
//! });
//! let person = NavMap::from_json(json)?;
//!
//! let names: Vec<String> = person
//!     .maps("friends")?
//!     .filter_map(|friend| friend.text("name").ok().flatten())
//!     .collect();
//! assert_eq!(names, ["Jane", "Joe"]);
//! # Ok::<(), navmap::Error>(())
//! ```

use serde::{
    Serialize, Serializer,
    ser::{Error as _, SerializeMap, SerializeSeq},
};

use crate::{Entries, NavMap, RawMap, Result, StoreKind, Value};

impl From<serde_json::Value> for Value {
    /// Objects become plain maps over an insertion-ordered store. Integers
    /// that fit in 32 bits become [`Value::Int`], wider ones [`Value::Long`],
    /// and everything else numeric [`Value::Double`].
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).map_or(Value::Long(i), Value::Int),
                None => n.as_f64().map_or(Value::Null, Value::Double),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => {
                let raw = RawMap::with_kind(StoreKind::Insertion);
                for (key, value) in fields {
                    raw.insert(key, Value::from(value));
                }
                Value::Map(raw)
            }
        }
    }
}

impl Value {
    /// Renders this value as compact JSON.
    ///
    /// Fails if the tree contains an [`Value::Object`].
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl NavMap {
    /// Wraps a decoded JSON object.
    ///
    /// `null` is rejected as [`Error::InvalidArgument`](crate::Error) and any
    /// non-object as [`Error::InvalidNavigation`](crate::Error).
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        NavMap::wrap(Value::from(json))
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// JSON has no way to express a map stored inside itself, so a direct
/// self-reference is an error. Longer cycles are not detected.
fn serialize_entries<S: Serializer>(
    owner: &RawMap,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let entries = owner.entries();
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in &entries {
        if value.is_same_map(owner) {
            return Err(S::Error::custom(format!(
                "map contains itself under key '{key}'"
            )));
        }
        map.serialize_entry(key, value)?;
    }
    map.end()
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i32(*n),
            Value::Long(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f32(*n),
            Value::Double(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => t.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(raw) => serialize_entries(raw, serializer),
            Value::Nav(nav) => serialize_entries(nav.raw(), serializer),
            Value::Object(_) => Err(S::Error::custom("opaque objects cannot be serialized")),
        }
    }
}

impl Serialize for RawMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_entries(self, serializer)
    }
}

impl Serialize for NavMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_entries(self.raw(), serializer)
    }
}
