//! The dynamic value type stored in navigable maps.
//!
//! A loosely structured payload (a decoded JSON document, a config tree) is a
//! tree of [`Value`]s: scalars at the leaves, lists and maps in between.
//! Nested maps are held by handle, so the same nested map can be reached from
//! several places and a wrapper around it is a view, not a copy.
//!
//! Typed reads go through [`FromValue`], an explicit tagged downcast that
//! reports [`Error::TypeMismatch`] instead of guessing. There is no coercion:
//! `Text("42")` is never an integer and `Int(1)` is never a `Long`.

use std::{
    any::Any,
    collections::{BTreeMap, HashMap},
    fmt,
    sync::Arc,
};

use chrono::{DateTime, Utc};

use crate::{Entries, Error, NavMap, RawMap, Result};

/// Values that can be stored in a map.
///
/// # Leaf values
/// - [`Value::Null`] - absent/null, never stored by the null-skipping helpers
/// - [`Value::Bool`], [`Value::Int`], [`Value::Long`], [`Value::Float`],
///   [`Value::Double`], [`Value::Text`], [`Value::Timestamp`]
/// - [`Value::Object`] - any caller type, opaque to the library
///
/// # Branch values
/// - [`Value::List`] - ordered sequence of values
/// - [`Value::Map`] - plain nested map, shared by handle
/// - [`Value::Nav`] - nested map that is already a [`NavMap`]
///
/// ```
/// # use navmap::Value;
/// let number = Value::from(42);
/// let text = Value::from("hello");
///
/// assert!(number == 42);
/// assert!(text == "hello");
/// assert!(!(number == Value::Long(42)));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
    Map(RawMap),
    Nav(NavMap),
    Object(Opaque),
}

impl Value {
    /// Wraps an arbitrary caller value
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(Opaque::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for both plain and wrapped maps
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Nav(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns true if this is a leaf value (terminal node)
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Value::List(_) | Value::Map(_) | Value::Nav(_))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Nav(_) => "navmap",
            Value::Object(_) => "object",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Downcasts to a value of type `V`
    pub fn cast<V: FromValue>(self) -> Result<V> {
        V::from_value(self)
    }

    /// Snapshot of the entries if this value is a map of either kind
    pub(crate) fn map_entries(&self) -> Option<Vec<(String, Value)>> {
        match self {
            Value::Map(raw) => Some(raw.entries()),
            Value::Nav(nav) => Some(nav.entries()),
            _ => None,
        }
    }

    /// True if this value is a map over `store` itself
    pub(crate) fn is_same_map(&self, store: &RawMap) -> bool {
        match self {
            Value::Map(raw) => raw.ptr_eq(store),
            Value::Nav(nav) => nav.raw().ptr_eq(store),
            _ => false,
        }
    }
}

/// An arbitrary caller value carried through a map untouched.
///
/// Equality is identity: two `Opaque`s are equal only if they share the same
/// allocation.
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque(Arc::new(value))
    }

    /// Shares an existing allocation instead of moving a value in
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Opaque(value)
    }

    /// Returns a shared reference to the inner value if it is a `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).downcast::<T>().ok()
    }

    pub fn is<T: Any>(&self) -> bool {
        (*self.0).is::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opaque(..)")
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Compares two entry snapshots as unordered maps
pub(crate) fn same_entries(left: Vec<(String, Value)>, right: Vec<(String, Value)>) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let right: HashMap<String, Value> = right.into_iter().collect();
    left.iter()
        .all(|(key, value)| right.get(key).is_some_and(|other| value == other))
}

/// Renders `{k=v, ...}`. A map stored directly inside itself prints as
/// `(this map)`; longer cycles are not detected.
pub(crate) fn fmt_entries(f: &mut fmt::Formatter<'_>, owner: &RawMap) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in owner.entries().iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if value.is_same_map(owner) {
            write!(f, "{key}=(this map)")?;
        } else {
            write!(f, "{key}={value}")?;
        }
    }
    write!(f, "}}")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Nav(a), Value::Nav(b)) if a.ptr_eq(b) => true,
            (Value::Map(a), Value::Map(b)) if a.ptr_eq(b) => true,
            _ => match (self.map_entries(), other.map_entries()) {
                (Some(left), Some(right)) => same_entries(left, right),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(raw) => write!(f, "{raw}"),
            Value::Nav(nav) => write!(f, "{nav}"),
            Value::Object(_) => write!(f, "<object>"),
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<RawMap> for Value {
    fn from(value: RawMap) -> Self {
        Value::Map(value)
    }
}

impl From<NavMap> for Value {
    fn from(value: NavMap) -> Self {
        Value::Nav(value)
    }
}

impl From<Opaque> for Value {
    fn from(value: Opaque) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> From<HashMap<String, V>> for Value {
    fn from(value: HashMap<String, V>) -> Self {
        Value::Map(value.into_iter().collect())
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(value: BTreeMap<String, V>) -> Self {
        Value::Map(value.into_iter().collect())
    }
}

/// Tagged downcast from a [`Value`].
///
/// Implementations accept exactly one variant (or, for maps, the two map
/// variants) and report [`Error::TypeMismatch`] for anything else, `Null`
/// included. Absent values are handled by the accessors before a cast is
/// attempted.
pub trait FromValue: Sized {
    /// Name of the target kind used in error messages
    const KIND: &'static str;

    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for Value {
    const KIND: &'static str = "value";

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    const KIND: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

impl FromValue for i32 {
    const KIND: &'static str = "int";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

impl FromValue for i64 {
    const KIND: &'static str = "long";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Long(n) => Ok(n),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

impl FromValue for f32 {
    const KIND: &'static str = "float";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(n) => Ok(n),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

impl FromValue for f64 {
    const KIND: &'static str = "double";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Double(n) => Ok(n),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

impl FromValue for String {
    const KIND: &'static str = "text";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    const KIND: &'static str = "timestamp";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(t) => Ok(t),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

impl FromValue for RawMap {
    const KIND: &'static str = "map";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(raw) => Ok(raw),
            Value::Nav(nav) => Ok(nav.raw().clone()),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

/// Casting to a [`NavMap`] applies the autowrap rule.
impl FromValue for NavMap {
    const KIND: &'static str = "navmap";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Err(Error::mismatch(Self::KIND, &value)),
            other => NavMap::wrap(other),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const KIND: &'static str = "list";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::mismatch(Self::KIND, &other)),
        }
    }
}

/// Opaque caller objects are read back by their concrete type.
impl<T: Any + Send + Sync> FromValue for Arc<T> {
    const KIND: &'static str = "object";

    fn from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Object(opaque) => opaque.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual: "object".to_string(),
            }),
            other => Err(Error::mismatch(Self::KIND, other)),
        }
    }
}

// Comparisons with primitives, for terse assertions
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Value::Text(s) if s == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Long(n) if n == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}
