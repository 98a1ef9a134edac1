//! The navigable map contract.
//!
//! [`Navigable`] decorates an untyped key/value store with a fluent API for
//! mutation, typed extraction and navigation into nested maps. Implementors
//! supply the store primitives, an exclusive guard and the autowrap rule; the
//! rest of the surface is provided here.
//!
//! # Views and copies
//!
//! [`Navigable::map`] and [`Navigable::maps`] navigate *into* the structure:
//! the returned maps share storage with the nested maps they wrap, so writes
//! through them are visible from the parent. [`Navigable::sub_map`] and
//! [`Navigable::copy`] *extract*: they build new stores and are independent of
//! their source afterwards (nested maps are still shared, copies are shallow).
//!
//! # Atomicity
//!
//! Every operation that combines a presence check with a read or write holds
//! the map's [`exclusive`](Navigable::exclusive) guard for its duration, so it
//! cannot interleave with another compound operation on the same map. Single
//! step operations (`add`, `get`, `valued`) take no guard and are only as
//! atomic as the store itself.
//!
//! # Null handling
//!
//! A key is *valued* when it holds something other than [`Value::Null`].
//! Absent keys and keys holding `Null` are indistinguishable to every method
//! here. The `add` family never stores `Null`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::{Entries, Error, FromValue, Result, Store, Value};

/// Guard held by compound operations. It is re-entrant, so a compound
/// operation may call another one on the same map.
pub type Exclusive<'a> = parking_lot::ReentrantMutexGuard<'a, ()>;

/// A lazily consumed, finite sequence produced by the stream accessors.
///
/// Each call to an accessor derives a fresh sequence from the current state.
pub type Stream<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// A fluent, typed decorator over an untyped key/value store.
///
/// Keys are text. Values are [`Value`]s. Mutators return `&Self` so calls can
/// be chained:
///
/// ```
/// use navmap::{NavMap, Navigable};
///
/// let person = NavMap::new();
/// person
///     .add("name", "John")
///     .add("nickname", None::<&str>)
///     .add("address", NavMap::new().with("street", "One way").with("number", 1));
///
/// assert!(person.not_valued("nickname"));
/// assert_eq!(person.map("address")?.unwrap().int("number")?, 1);
/// # Ok::<(), navmap::Error>(())
/// ```
pub trait Navigable: Entries + Sized {
    // ===== STORE PRIMITIVES =====

    /// Returns the raw value stored under `key`
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores a raw value, `Null` included, returning the previous one
    fn put(&self, key: &str, value: Value) -> Option<Value>;

    fn remove(&self, key: &str) -> Option<Value>;

    fn contains_key(&self, key: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Acquires the guard that serializes compound operations on this map
    fn exclusive(&self) -> Exclusive<'_>;

    /// Converts a raw value into a navigable map.
    ///
    /// Implementations must return an already wrapped map unchanged, wrap a
    /// plain map as a view over the same storage, return `None` for `Null`
    /// and fail with [`Error::InvalidNavigation`] for anything else.
    fn autowrap(value: Value) -> Result<Option<Self>>;

    /// Creates a new map over a fresh store of the same kind, holding only
    /// the given keys that are valued here.
    ///
    /// Fails with [`Error::BackingStoreConstruction`] if no such store can be
    /// created; use [`Navigable::sub_map_in`] in that case.
    fn sub_map<I, K>(&self, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>;

    /// Same as [`Navigable::sub_map`], copying into the given store
    fn sub_map_in<I, K>(&self, store: Box<dyn Store>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>;

    /// Shallow copy: new top-level store, nested values shared
    fn copy(&self) -> Self;

    fn keys(&self) -> Vec<String> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }

    // ===== MUTATION =====

    /// Stores `value` under `key` unless it is `Null`
    fn add(&self, key: &str, value: impl Into<Value>) -> &Self {
        let value = value.into();
        if !value.is_null() {
            self.put(key, value);
        }
        self
    }

    /// Adds every non-null entry of every source, in source order.
    ///
    /// Accepts anything iterable: an array of maps, a vector, an iterator.
    fn add_all<I>(&self, sources: I) -> &Self
    where
        I: IntoIterator,
        I::Item: Entries,
    {
        let _guard = self.exclusive();
        let mut seen = 0usize;
        for source in sources {
            for (key, value) in source.entries() {
                self.add(&key, value);
                seen += 1;
            }
        }
        trace!(entries = seen, "add_all");
        self
    }

    /// Adds the listed keys of `source`, skipping nulls.
    ///
    /// An empty key list copies every entry. A `None` source is a no-op.
    fn add_from<S, I, K>(&self, source: S, keys: I) -> &Self
    where
        S: Entries,
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: HashSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        if keys.is_empty() {
            return self.add_all([source]);
        }

        let _guard = self.exclusive();
        let mut copied = 0usize;
        for (key, value) in source.entries() {
            if keys.contains(&key) {
                self.add(&key, value);
                copied += 1;
            }
        }
        trace!(keys = keys.len(), entries = copied, "add_from");
        self
    }

    /// Moves the value under `old_key` to `new_key`, overwriting whatever
    /// `new_key` held. Does nothing if `old_key` is absent.
    fn rename_key(&self, old_key: &str, new_key: &str) -> &Self {
        let _guard = self.exclusive();
        if old_key == new_key || !self.contains_key(old_key) {
            return self;
        }
        if let Some(value) = self.remove(old_key) {
            self.put(new_key, value);
            trace!(old_key, new_key, "renamed key");
        }
        self
    }

    /// Removes every listed key; absent keys are ignored
    fn del<I, K>(&self, keys: I) -> &Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let _guard = self.exclusive();
        let mut removed = 0usize;
        for key in keys {
            if self.remove(key.as_ref()).is_some() {
                removed += 1;
            }
        }
        trace!(removed, "del");
        self
    }

    // ===== PRESENCE =====

    /// True if `key` holds a non-null value
    fn valued(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    fn not_valued(&self, key: &str) -> bool {
        !self.valued(key)
    }

    /// Runs `extract` if `key` is valued, else returns `default`.
    ///
    /// The check and the extraction run under the exclusive guard.
    fn default_if_missing<V, F>(&self, key: &str, default: V, extract: F) -> Result<V>
    where
        F: FnOnce(&Self, &str) -> Result<V>,
    {
        let _guard = self.exclusive();
        if self.valued(key) {
            extract(self, key)
        } else {
            Ok(default)
        }
    }

    // ===== TYPED EXTRACTION =====

    /// Casts the value under `key`; an absent value is [`Error::MissingValue`]
    fn required<T: FromValue>(&self, key: &str) -> Result<T> {
        match self.get(key) {
            None | Some(Value::Null) => Err(Error::MissingValue {
                key: key.to_string(),
            }),
            Some(value) => T::from_value(value),
        }
    }

    /// Casts the value under `key`; an absent value is `Ok(None)`.
    ///
    /// With `T = Value` this returns the stored value unchanged.
    fn object<T: FromValue>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::from_value(value).map(Some),
        }
    }

    fn object_or<T: FromValue>(&self, key: &str, default: T) -> Result<T> {
        self.default_if_missing(key, default, Self::required::<T>)
    }

    /// Applies `transform` to the value under `key`, absent or not
    fn object_with<V, F>(&self, key: &str, transform: F) -> V
    where
        F: FnOnce(Option<Value>) -> V,
    {
        transform(self.get(key).filter(|value| !value.is_null()))
    }

    /// Applies `transform` to the value under `key` if valued, else returns
    /// `default`
    fn object_with_or<V, F>(&self, key: &str, transform: F, default: V) -> V
    where
        F: FnOnce(Value) -> V,
    {
        let _guard = self.exclusive();
        match self.get(key) {
            Some(value) if !value.is_null() => transform(value),
            _ => default,
        }
    }

    fn int(&self, key: &str) -> Result<i32> {
        self.required(key)
    }

    fn int_or(&self, key: &str, default: i32) -> Result<i32> {
        self.default_if_missing(key, default, Self::int)
    }

    fn long(&self, key: &str) -> Result<i64> {
        self.required(key)
    }

    fn long_or(&self, key: &str, default: i64) -> Result<i64> {
        self.default_if_missing(key, default, Self::long)
    }

    fn double(&self, key: &str) -> Result<f64> {
        self.required(key)
    }

    fn double_or(&self, key: &str, default: f64) -> Result<f64> {
        self.default_if_missing(key, default, Self::double)
    }

    fn float(&self, key: &str) -> Result<f32> {
        self.required(key)
    }

    fn float_or(&self, key: &str, default: f32) -> Result<f32> {
        self.default_if_missing(key, default, Self::float)
    }

    fn boolean(&self, key: &str) -> Result<bool> {
        self.required(key)
    }

    fn boolean_or(&self, key: &str, default: bool) -> Result<bool> {
        self.default_if_missing(key, default, Self::boolean)
    }

    /// Text is nullable: an absent key is `Ok(None)`
    fn text(&self, key: &str) -> Result<Option<String>> {
        self.object(key)
    }

    fn text_or(&self, key: &str, default: impl Into<String>) -> Result<String> {
        self.default_if_missing(key, default.into(), Self::required::<String>)
    }

    /// Timestamps are nullable: an absent key is `Ok(None)`
    fn timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        self.object(key)
    }

    fn timestamp_or(&self, key: &str, default: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.default_if_missing(key, default, Self::required::<DateTime<Utc>>)
    }

    /// Reads a list into any collection type, casting every element
    fn collection<T, C>(&self, key: &str) -> Result<Option<C>>
    where
        T: FromValue,
        C: FromIterator<T>,
    {
        Ok(self
            .object::<Vec<T>>(key)?
            .map(|items| items.into_iter().collect()))
    }

    fn collection_or<T, C>(&self, key: &str, default: C) -> Result<C>
    where
        T: FromValue,
        C: FromIterator<T>,
    {
        self.default_if_missing(key, default, |map, key| {
            Ok(map.required::<Vec<T>>(key)?.into_iter().collect())
        })
    }

    /// Reads an ordered list, casting every element
    fn list<T: FromValue>(&self, key: &str) -> Result<Option<Vec<T>>> {
        self.object(key)
    }

    fn list_or<T: FromValue>(&self, key: &str, default: Vec<T>) -> Result<Vec<T>> {
        self.default_if_missing(key, default, Self::required::<Vec<T>>)
    }

    /// Streams the elements of a list; an absent key is [`Error::MissingValue`]
    fn stream<'a, T>(&self, key: &str) -> Result<Stream<'a, T>>
    where
        T: FromValue + 'a,
    {
        let items = self.required::<Vec<T>>(key)?;
        Ok(Box::new(items.into_iter()))
    }

    /// Streams the elements of a list, or `default` if `key` is not valued.
    ///
    /// `default` may be an iterator or a collection.
    fn stream_or<'a, T, I>(&self, key: &str, default: I) -> Result<Stream<'a, T>>
    where
        T: FromValue + 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        let default: Stream<'a, T> = Box::new(default.into_iter());
        self.default_if_missing(key, default, |map, key| map.stream(key))
    }

    // ===== NAVIGATION =====

    /// Navigates into the nested map under `key`.
    ///
    /// Returns an already wrapped map as is, wraps a plain map as a view over
    /// the same storage, and returns `Ok(None)` for an absent key. Any other
    /// value is [`Error::InvalidNavigation`].
    fn map(&self, key: &str) -> Result<Option<Self>> {
        Self::autowrap(self.get(key).unwrap_or_default())
    }

    fn map_or(&self, key: &str, default: Self) -> Result<Self> {
        self.default_if_missing(key, default, |map, key| {
            map.map(key)?.ok_or_else(|| Error::MissingValue {
                key: key.to_string(),
            })
        })
    }

    /// Navigates into every map of the list under `key`.
    ///
    /// Each element is autowrapped like [`Navigable::map`]; a single element
    /// that is not a map fails the whole call. An absent key yields an empty
    /// stream rather than an error.
    fn maps(&self, key: &str) -> Result<Stream<'static, Self>>
    where
        Self: 'static,
    {
        let empty: Stream<'static, Self> = Box::new(std::iter::empty());
        self.default_if_missing(key, empty, |map, key| {
            let items = map.required::<Vec<Value>>(key)?;
            let wrapped = items
                .into_iter()
                .map(|item| {
                    // autowrap only yields None for a null element
                    Self::autowrap(item)?.ok_or_else(|| Error::InvalidNavigation {
                        value: "null".to_string(),
                    })
                })
                .collect::<Result<Vec<Self>>>()?;
            Ok(Box::new(wrapped.into_iter()) as Stream<'static, Self>)
        })
    }

    fn maps_or<I>(&self, key: &str, default: I) -> Result<Stream<'static, Self>>
    where
        Self: 'static,
        I: IntoIterator<Item = Self>,
        I::IntoIter: 'static,
    {
        let default: Stream<'static, Self> = Box::new(default.into_iter());
        self.default_if_missing(key, default, Self::maps)
    }
}
