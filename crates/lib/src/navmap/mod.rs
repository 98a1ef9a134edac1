//! The default [`Navigable`] implementation.
//!
//! [`NavMap`] is a cheap handle: cloning it yields the *same* map (same store,
//! same guard), which is how [`Navigable::map`] can hand back a nested
//! `NavMap` unchanged. Wrapping a plain [`RawMap`] creates a new `NavMap` that
//! shares the raw map's store, i.e. a view.
//!
//! ```
//! use navmap::{NavMap, Navigable};
//!
//! let user = NavMap::new()
//!     .with("name", "John")
//!     .with("address", NavMap::new().with("street", "One way").with("number", 1));
//!
//! user.map("address")?.unwrap().rename_key("street", "st");
//!
//! let address = user.map("address")?.unwrap();
//! assert!(address.valued("st"));
//! assert!(address.not_valued("street"));
//! # Ok::<(), navmap::Error>(())
//! ```

use std::{fmt, sync::Arc};

use parking_lot::ReentrantMutex;
use tracing::debug;

use crate::{
    Entries, Error, Exclusive, Navigable, RawMap, Result, Store, StoreKind, Value,
    value::{fmt_entries, same_entries},
};


/// A navigable map over an injectable backing store.
///
/// Defaults to a hash store. Use [`NavMap::with_kind`] or
/// [`NavMap::with_store`] to pick another one, and [`NavMap::from_raw`] to
/// view an existing plain map.
#[derive(Clone)]
pub struct NavMap {
    inner: Arc<Inner>,
}

struct Inner {
    store: RawMap,
    /// Serializes compound operations on this instance
    guard: ReentrantMutex<()>,
}

impl NavMap {
    /// Creates an empty map over a hash store
    pub fn new() -> Self {
        Self::from_raw(RawMap::new())
    }

    pub fn with_kind(kind: StoreKind) -> Self {
        Self::from_raw(RawMap::with_kind(kind))
    }

    /// Creates a map over the given store, keeping its current entries
    pub fn with_store(store: Box<dyn Store>) -> Self {
        Self::from_raw(RawMap::from_store(store))
    }

    /// Wraps a plain map. The result is a view: both handles share storage.
    pub fn from_raw(store: RawMap) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                guard: ReentrantMutex::new(()),
            }),
        }
    }

    /// Creates a map with one initial entry (skipped if null)
    pub fn of(key: &str, value: impl Into<Value>) -> Self {
        Self::new().with(key, value)
    }

    /// Creates a map with two initial entries
    pub fn of2(
        key1: &str,
        value1: impl Into<Value>,
        key2: &str,
        value2: impl Into<Value>,
    ) -> Self {
        Self::of(key1, value1).with(key2, value2)
    }

    /// Creates a map with three initial entries
    pub fn of3(
        key1: &str,
        value1: impl Into<Value>,
        key2: &str,
        value2: impl Into<Value>,
        key3: &str,
        value3: impl Into<Value>,
    ) -> Self {
        Self::of2(key1, value1, key2, value2).with(key3, value3)
    }

    /// Owned form of [`Navigable::add`], handy when building nested literals
    pub fn with(self, key: &str, value: impl Into<Value>) -> Self {
        self.add(key, value);
        self
    }

    /// Applies the autowrap rule to a non-null value.
    ///
    /// `Null` is rejected with [`Error::InvalidArgument`], since there is no
    /// store to wrap.
    pub fn wrap(value: Value) -> Result<Self> {
        match value {
            Value::Nav(nav) => Ok(nav),
            Value::Map(raw) => Ok(Self::from_raw(raw)),
            Value::Null => Err(Error::InvalidArgument {
                reason: "cannot wrap a null backing store".to_string(),
            }),
            other => Err(Error::InvalidNavigation {
                value: other.to_string(),
            }),
        }
    }

    /// The backing store, for raw put-style access
    pub fn raw(&self) -> &RawMap {
        &self.inner.store
    }

    /// Returns true if both handles are the same map instance
    pub fn ptr_eq(&self, other: &NavMap) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns true if both maps read and write the same store
    pub fn shares_store(&self, other: &NavMap) -> bool {
        self.raw().ptr_eq(other.raw())
    }

    pub fn clear(&self) {
        self.raw().clear();
    }

    /// Copies the listed keys into a new map over `store`
    fn derive<I, K>(&self, store: RawMap, keys: I) -> NavMap
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let _guard = self.exclusive();
        let derived = NavMap::from_raw(store);
        for key in keys {
            let key = key.as_ref();
            derived.add(key, self.get(key).unwrap_or_default());
        }
        debug!(
            store = derived.raw().kind(),
            entries = derived.len(),
            "derived sub map"
        );
        derived
    }
}

impl Default for NavMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Entries for NavMap {
    fn entries(&self) -> Vec<(String, Value)> {
        self.inner.store.entries()
    }
}

impl Navigable for NavMap {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.store.get(key)
    }

    fn put(&self, key: &str, value: Value) -> Option<Value> {
        self.inner.store.insert(key, value)
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.inner.store.remove(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.inner.store.contains_key(key)
    }

    fn len(&self) -> usize {
        self.inner.store.len()
    }

    fn is_empty(&self) -> bool {
        self.inner.store.is_empty()
    }

    fn keys(&self) -> Vec<String> {
        self.inner.store.keys()
    }

    fn exclusive(&self) -> Exclusive<'_> {
        self.inner.guard.lock()
    }

    fn autowrap(value: Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            other => Self::wrap(other).map(Some),
        }
    }

    fn sub_map<I, K>(&self, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let store = self
            .raw()
            .empty_like()
            .ok_or_else(|| Error::BackingStoreConstruction {
                store: self.raw().kind().to_string(),
            })?;
        Ok(self.derive(store, keys))
    }

    fn sub_map_in<I, K>(&self, store: Box<dyn Store>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.derive(RawMap::from_store(store), keys)
    }

    fn copy(&self) -> Self {
        let _guard = self.exclusive();
        let copy = NavMap::from_raw(self.raw().empty_like().unwrap_or_default());
        copy.add_all([self]);
        debug!(entries = copy.len(), "copied map");
        copy
    }
}

impl TryFrom<Value> for NavMap {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::wrap(value)
    }
}

impl<K, V> FromIterator<(K, V)> for NavMap
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = NavMap::new();
        for (key, value) in iter {
            map.add(key.as_ref(), value);
        }
        map
    }
}

impl PartialEq for NavMap {
    fn eq(&self, other: &Self) -> bool {
        self.shares_store(other) || same_entries(self.entries(), other.entries())
    }
}

impl fmt::Debug for NavMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavMap")
            .field("store", &self.inner.store)
            .finish()
    }
}

impl fmt::Display for NavMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_entries(f, self.raw())
    }
}
