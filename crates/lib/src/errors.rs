//! Error types for map navigation and typed extraction.
//!
//! Every error is raised synchronously by the call that triggers it. The
//! library performs no I/O, so nothing here is transient or retried.

use thiserror::Error;

/// Structured error type for every fallible `navmap` operation.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// The stored value is not of the requested kind
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// A non-defaulted primitive accessor was called on a key with no value
    #[error("no value for key '{key}'")]
    MissingValue { key: String },

    /// Autowrap was asked to navigate into something that is not a map
    #[error("{value} is neither a map nor a navigable map")]
    InvalidNavigation { value: String },

    /// A constructor was handed an unusable argument
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// An empty store of the same kind could not be produced
    #[error(
        "cannot create a new empty instance of {store}; use a store that implements \
         `Store::empty_like` or pass a backing store to `sub_map_in`"
    )]
    BackingStoreConstruction { store: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Builds a [`Error::TypeMismatch`] for `value` not being `expected`.
    pub(crate) fn mismatch(expected: &'static str, value: &crate::Value) -> Self {
        Error::TypeMismatch {
            expected,
            actual: value.type_name().to_string(),
        }
    }

    /// Check if the stored value had the wrong kind.
    ///
    /// Autowrap rejections count as type errors as well.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. } | Error::InvalidNavigation { .. }
        )
    }

    /// Check if a required value was absent
    pub fn is_missing_value(&self) -> bool {
        matches!(self, Error::MissingValue { .. })
    }

    /// Check if navigation into a nested map was rejected
    pub fn is_invalid_navigation(&self) -> bool {
        matches!(self, Error::InvalidNavigation { .. })
    }

    /// Check if a constructor rejected its argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    /// Check if a same-kind backing store could not be created
    pub fn is_construction_error(&self) -> bool {
        matches!(self, Error::BackingStoreConstruction { .. })
    }

    /// Get the key if this error is about a specific key
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::MissingValue { key } => Some(key),
            _ => None,
        }
    }
}
