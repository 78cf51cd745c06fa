//! Shared failure taxonomy
//!
//! Every error in the workspace maps onto one of a few [`ErrorKind`]s so
//! the collaborator boundary can report failures uniformly without
//! inspecting crate-specific variants.

use std::fmt::{self, Display, Formatter};

/// Coarse classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A supplied value disagrees with a declared expectation
    BadValue,
    /// Structurally inconsistent or malformed input
    BadFormat,
    /// No entity with the requested identifier
    NotFound,
    /// Storage layer failure
    Database,
    /// Unexpected internal failure
    Internal,
}

impl ErrorKind {
    /// Stable wire code for this kind
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::BadValue => "BAD_VALUE",
            Self::BadFormat => "BAD_FORMAT",
            Self::NotFound => "NOT_FOUND",
            Self::Database => "DATABASE",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether the failure is attributable to the caller
    #[inline]
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(self, Self::BadValue | Self::BadFormat | Self::NotFound)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors from the feature data model
#[derive(Debug, thiserror::Error)]
pub enum FeaturesError {
    /// Transport-encoded features that are not valid standard base64
    #[error("invalid base64 features: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// An id string that does not match `<tag>-<hex digest>`
    #[error("malformed features id `{id}`: {reason}")]
    MalformedId {
        /// The offending id string
        id: String,
        /// What failed to parse
        reason: String,
    },
}

impl FeaturesError {
    pub(crate) fn malformed_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// The kind of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encoding(_) | Self::MalformedId { .. } => ErrorKind::BadValue,
        }
    }
}
