//! Backing stores for navigable maps.
//!
//! This module defines the [`Store`] trait that abstracts the associative
//! container actually holding key/value pairs, the shared [`RawMap`] handle
//! that plays the role of a plain nested map inside a [`Value`] tree, and the
//! [`Entries`] trait used as the source side of bulk copies.
//!
//! Stores are swappable: a [`NavMap`](crate::NavMap) can sit on top of a hash
//! table, a sorted tree or an insertion-ordered map. Iteration order is
//! whatever the chosen store provides.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    hash::BuildHasher,
    str::FromStr,
    sync::Arc,
};

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::{Error, Value};

mod builtin;

/// The associative container underneath a map.
///
/// Implementations only need the usual map primitives. [`Store::empty_like`]
/// is the factory capability used when a map has to derive a fresh store of
/// the same kind (see [`Navigable::sub_map`](crate::Navigable::sub_map)).
/// Stores that cannot produce one keep the default and return `None`.
///
/// All stores must be `Send` and `Sync` so maps can be shared across threads.
pub trait Store: Send + Sync + fmt::Debug {
    /// Short, human readable name of the store kind
    fn kind(&self) -> &'static str;

    /// Returns the value stored under `key`
    fn get(&self, key: &str) -> Option<&Value>;

    /// Stores `value` under `key`, returning the previous value
    fn insert(&mut self, key: String, value: Value) -> Option<Value>;

    /// Removes `key`, returning its value if it was present
    fn remove(&mut self, key: &str) -> Option<Value>;

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates entries in the store's native order
    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_>;

    /// Removes every entry
    fn clear(&mut self) {
        let keys: Vec<String> = self.iter().map(|(k, _)| k.to_string()).collect();
        for key in keys {
            self.remove(&key);
        }
    }

    /// Creates a new, empty store of the same kind, if this store knows how.
    fn empty_like(&self) -> Option<Box<dyn Store>> {
        None
    }
}

/// Selects one of the built-in store implementations.
///
/// This is the configuration knob for callers that pick a backing store from
/// their own settings:
///
/// ```
/// # use navmap::StoreKind;
/// let kind: StoreKind = "insertion".parse().unwrap();
/// assert_eq!(kind, StoreKind::Insertion);
/// assert_eq!(StoreKind::default(), StoreKind::Hash);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// `HashMap`, no ordering guarantee
    #[default]
    Hash,
    /// `BTreeMap`, entries sorted by key
    Ordered,
    /// `IndexMap`, entries in insertion order
    Insertion,
}

impl StoreKind {
    /// Creates an empty store of this kind
    pub fn create(self) -> Box<dyn Store> {
        match self {
            StoreKind::Hash => Box::new(HashMap::<String, Value>::new()),
            StoreKind::Ordered => Box::new(BTreeMap::<String, Value>::new()),
            StoreKind::Insertion => Box::new(IndexMap::<String, Value>::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Hash => "hash",
            StoreKind::Ordered => "ordered",
            StoreKind::Insertion => "insertion",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(StoreKind::Hash),
            "ordered" => Ok(StoreKind::Ordered),
            "insertion" => Ok(StoreKind::Insertion),
            other => Err(Error::InvalidArgument {
                reason: format!("unknown store kind '{other}'"),
            }),
        }
    }
}

/// A plain associative container shared by handle.
///
/// `RawMap` is what a nested map looks like inside a [`Value`] tree before
/// anything wraps it. Cloning the handle does not copy the data: every clone
/// reads and writes the same store, which is what lets a
/// [`NavMap`](crate::NavMap) act as a view over a nested map.
///
/// `RawMap` applies no null-skipping: [`RawMap::insert`] will happily store
/// [`Value::Null`].
#[derive(Clone)]
pub struct RawMap {
    store: Arc<RwLock<Box<dyn Store>>>,
}

impl RawMap {
    /// Creates an empty map over the default hash store
    pub fn new() -> Self {
        Self::with_kind(StoreKind::default())
    }

    pub fn with_kind(kind: StoreKind) -> Self {
        Self::from_store(kind.create())
    }

    /// Wraps an existing store
    pub fn from_store(store: Box<dyn Store>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Returns a clone of the value under `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.store.read().get(key).cloned()
    }

    /// Stores a value, including `Null`, returning the previous one
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.store.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.store.write().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Keys in the store's native order
    pub fn keys(&self) -> Vec<String> {
        self.store
            .read()
            .iter()
            .map(|(k, _)| k.to_string())
            .collect()
    }

    pub fn clear(&self) {
        self.store.write().clear();
    }

    /// Name of the underlying store kind
    pub fn kind(&self) -> &'static str {
        self.store.read().kind()
    }

    /// Creates a new, empty map over a store of the same kind
    pub fn empty_like(&self) -> Option<RawMap> {
        self.store.read().empty_like().map(RawMap::from_store)
    }

    /// Returns true if both handles point at the same store
    pub fn ptr_eq(&self, other: &RawMap) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl Default for RawMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RawMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.read();
        f.debug_struct("RawMap")
            .field("kind", &store.kind())
            .field("len", &store.len())
            .finish()
    }
}

impl fmt::Display for RawMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::value::fmt_entries(f, self)
    }
}

impl PartialEq for RawMap {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || crate::value::same_entries(self.entries(), other.entries())
    }
}

impl<K, V> FromIterator<(K, V)> for RawMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = RawMap::new();
        {
            let mut store = map.store.write();
            for (key, value) in iter {
                store.insert(key.into(), value.into());
            }
        }
        map
    }
}

/// Anything that can be snapshotted into `(key, value)` pairs.
///
/// Used as the source side of [`Navigable::add_all`](crate::Navigable::add_all)
/// and [`Navigable::add_from`](crate::Navigable::add_from). The snapshot is
/// taken before any entry is copied, so a map may safely be its own source.
/// `None` is an empty source.
pub trait Entries {
    /// Snapshot of every entry in native iteration order
    fn entries(&self) -> Vec<(String, Value)>;
}

impl Entries for RawMap {
    fn entries(&self) -> Vec<(String, Value)> {
        self.store
            .read()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl<T: Entries + ?Sized> Entries for &T {
    fn entries(&self) -> Vec<(String, Value)> {
        (**self).entries()
    }
}

impl<T: Entries> Entries for Option<T> {
    fn entries(&self) -> Vec<(String, Value)> {
        match self {
            Some(source) => source.entries(),
            None => Vec::new(),
        }
    }
}

impl<K, V, S> Entries for HashMap<K, V, S>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
    S: BuildHasher,
{
    fn entries(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.clone().into()))
            .collect()
    }
}

impl<K, V> Entries for BTreeMap<K, V>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.clone().into()))
            .collect()
    }
}

impl<K, V, S> Entries for IndexMap<K, V, S>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.clone().into()))
            .collect()
    }
}

impl<K, V> Entries for [(K, V)]
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        self.iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.clone().into()))
            .collect()
    }
}

impl<K, V> Entries for Vec<(K, V)>
where
    K: AsRef<str>,
    V: Clone + Into<Value>,
{
    fn entries(&self) -> Vec<(String, Value)> {
        self.as_slice().entries()
    }
}
