//!
//! navmap: fluent, typed navigation over loosely structured key/value data.
//! This library wraps an untyped map so callers can walk nested maps and lists
//! and pull out typed values without repeated casting or null checks.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The closed dynamic type stored in maps. Scalars, timestamps, lists, nested maps and opaque caller objects.
//! * **Backing stores (`store::Store`)**: The pluggable associative container underneath a map. Hash, sorted and insertion-ordered stores are built in (`store::StoreKind`).
//! * **Raw maps (`store::RawMap`)**: A plain nested map held by shared handle. This is what a decoded document looks like before anything wraps it.
//! * **The contract (`navigable::Navigable`)**: Null-skipping mutation, typed extraction with defaults, navigation with autowrap, and sub map derivation.
//! * **NavMap (`navmap::NavMap`)**: The default implementation over an injectable store, with a per-instance guard that serializes compound operations.
//! * **Views and copies**: Navigation (`map`, `maps`) returns views that share storage with the nested map. Derivation (`sub_map`, `copy`) returns independent snapshots.
//!
//! ```
//! use navmap::{NavMap, Navigable};
//!
//! let person = NavMap::new()
//!     .with("name", "John")
//!     .with("friends", vec![
//!         NavMap::of2("name", "Jane", "surname", "Doe"),
//!         NavMap::of2("name", "Joe", "surname", "Smith"),
//!     ]);
//!
//! let does = person
//!     .maps("friends")?
//!     .filter(|friend| friend.text("surname").ok().flatten().as_deref() == Some("Doe"))
//!     .count();
//! assert_eq!(does, 1);
//! assert_eq!(person.int_or("age", 30)?, 30);
//! assert!(person.int("age").unwrap_err().is_missing_value());
//! # Ok::<(), navmap::Error>(())
//! ```

pub mod errors;
pub mod json;
pub mod navigable;
pub mod navmap;
pub mod store;
pub mod value;

pub use errors::Error;
pub use navigable::{Exclusive, Navigable, Stream};
pub use navmap::NavMap;
pub use store::{Entries, RawMap, Store, StoreKind};
pub use value::{FromValue, Opaque, Value};

/// Result type used throughout the navmap library.
pub type Result<T> = std::result::Result<T, Error>;
