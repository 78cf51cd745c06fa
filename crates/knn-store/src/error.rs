//! Error types for store operations

use knn_features::{ErrorKind, FeaturesError, FeaturesId};

/// Errors from the feature store and its storage engines
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert hit an existing record with the same id
    #[error("duplicate id: {id}")]
    Duplicate {
        /// Id of the record already present
        id: FeaturesId,
    },

    /// No record matches the requested id or prefix
    #[error("no record matches id `{id}`")]
    NotFound {
        /// The id as supplied by the caller
        id: String,
    },

    /// A prefix lookup matched more than one record
    #[error("id prefix `{prefix}` is ambiguous: {matches} records match")]
    AmbiguousId {
        /// The prefix as supplied by the caller
        prefix: String,
        /// How many records matched it
        matches: usize,
    },

    /// Malformed features or id at the store boundary
    #[error(transparent)]
    Features(#[from] FeaturesError),

    /// The store handle has been closed
    #[error("store is closed")]
    Closed,

    /// Engine-level storage failure
    #[error("storage engine error: {0}")]
    Engine(String),
}

impl StoreError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub(crate) fn ambiguous(prefix: impl Into<String>, matches: usize) -> Self {
        Self::AmbiguousId {
            prefix: prefix.into(),
            matches,
        }
    }

    /// The kind of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AmbiguousId { .. } => ErrorKind::BadValue,
            Self::Features(e) => e.kind(),
            Self::Duplicate { .. } | Self::Closed | Self::Engine(_) => ErrorKind::Database,
        }
    }
}
