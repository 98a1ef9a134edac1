//! [`Store`] implementations for the standard map types.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use super::Store;
use crate::Value;

impl Store for HashMap<String, Value> {
    fn kind(&self) -> &'static str {
        "hash"
    }

    fn get(&self, key: &str) -> Option<&Value> {
        HashMap::get(self, key)
    }

    fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        HashMap::remove(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        HashMap::contains_key(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        Box::new(HashMap::iter(self).map(|(k, v)| (k.as_str(), v)))
    }

    fn clear(&mut self) {
        HashMap::clear(self);
    }

    fn empty_like(&self) -> Option<Box<dyn Store>> {
        Some(Box::new(HashMap::<String, Value>::new()))
    }
}

impl Store for BTreeMap<String, Value> {
    fn kind(&self) -> &'static str {
        "ordered"
    }

    fn get(&self, key: &str) -> Option<&Value> {
        BTreeMap::get(self, key)
    }

    fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        BTreeMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        BTreeMap::remove(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        Box::new(BTreeMap::iter(self).map(|(k, v)| (k.as_str(), v)))
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn empty_like(&self) -> Option<Box<dyn Store>> {
        Some(Box::new(BTreeMap::<String, Value>::new()))
    }
}

impl Store for IndexMap<String, Value> {
    fn kind(&self) -> &'static str {
        "insertion"
    }

    fn get(&self, key: &str) -> Option<&Value> {
        IndexMap::get(self, key)
    }

    fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        IndexMap::insert(self, key, value)
    }

    // shift_remove keeps the remaining entries in insertion order
    fn remove(&mut self, key: &str) -> Option<Value> {
        IndexMap::shift_remove(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        IndexMap::contains_key(self, key)
    }

    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        Box::new(IndexMap::iter(self).map(|(k, v)| (k.as_str(), v)))
    }

    fn clear(&mut self) {
        IndexMap::clear(self);
    }

    fn empty_like(&self) -> Option<Box<dyn Store>> {
        Some(Box::new(IndexMap::<String, Value>::new()))
    }
}
