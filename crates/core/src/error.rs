//! Unified error types for Corral.
//!
//! Caller-correctable conditions get their own variants so callers can match
//! on them; anything unexpected coming out of the engine boundary is wrapped
//! into [`Error::Engine`] with enough context to diagnose without exposing
//! engine internals in the public taxonomy.

use thiserror::Error;

/// All Corral errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The named collection does not exist in the environment.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// Attempted to allocate a collection that already exists.
    #[error("collection already exists: {0}")]
    CollectionAlreadyExists(String),

    /// Key byte length exceeds the engine maximum.
    ///
    /// This is a caller error; no mutation is performed.
    #[error("key is {len} bytes, engine limit is {max}")]
    OversizedKey {
        /// Byte length of the rejected key
        len: usize,
        /// Engine maximum key size in bytes
        max: usize,
    },

    /// A stored record could not be encoded or decoded as the requested
    /// document type.
    #[error("malformed document in collection `{collection}`: {source}")]
    Json {
        /// Collection the record belongs to
        collection: String,
        /// Underlying serde failure
        #[source]
        source: serde_json::Error,
    },

    /// Unexpected failure at the engine boundary (transaction, allocation,
    /// I/O). Carries the operation context and the underlying cause.
    #[error("{context}: {source}")]
    Engine {
        /// What the layer was doing when the engine failed
        context: String,
        /// Underlying engine failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O error outside the engine (directory setup).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Corral operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an engine-boundary failure with operation context.
    pub fn engine(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Engine {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Build a decode/encode failure for a record in `collection`.
    pub fn json(collection: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            collection: collection.into(),
            source,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::CollectionNotFound(_))
    }

    /// Check if this is an already-exists error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::CollectionAlreadyExists(_))
    }

    /// Check if the caller can correct this error (as opposed to an
    /// internal/system failure).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::CollectionNotFound(_)
                | Error::CollectionAlreadyExists(_)
                | Error::OversizedKey { .. }
                | Error::Json { .. }
        )
    }
}
