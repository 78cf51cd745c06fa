//! Combined service error and boundary reporting

use std::path::PathBuf;

use serde::Serialize;

use knn_classify::ClassifyError;
use knn_corpus::CorpusError;
use knn_features::{ErrorKind, FeaturesError};
use knn_store::StoreError;

/// Combined error across the service surface
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Feature data model failure
    #[error(transparent)]
    Features(#[from] FeaturesError),

    /// Corpus decoding failure
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// Feature store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Classification failure
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// A request parameter failed validation
    #[error("invalid parameter `{param}`: {reason}")]
    InvalidParam {
        /// Parameter name
        param: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration file could not be parsed
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO failure reading a corpus or config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub(crate) fn invalid_param(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            param,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The kind of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Features(e) => e.kind(),
            Self::Corpus(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::Classify(e) => e.kind(),
            Self::InvalidParam { .. } | Self::Config(_) => ErrorKind::BadValue,
            Self::Io { .. } => ErrorKind::Internal,
        }
    }
}

/// Boundary-facing rendering of a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Failure kind code, e.g. `NOT_FOUND`
    pub code: &'static str,
    /// Status hint for transport adapters
    pub status: u16,
    /// Caller-safe message
    pub message: String,
}

/// Map a failure to its boundary report
///
/// Client-attributable kinds keep their message. `Database` and
/// `Internal` failures are logged here and reported generically, so
/// engine details never reach collaborators.
#[must_use]
pub fn report(err: &ServiceError) -> ErrorReport {
    let kind = err.kind();
    let message = if kind.is_client_error() {
        err.to_string()
    } else {
        tracing::error!(error = %err, kind = %kind, "service failure");
        "internal server error".to_string()
    };
    ErrorReport {
        code: kind.code(),
        status: status_for(kind),
        message,
    }
}

const fn status_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::NotFound => 404,
        ErrorKind::BadValue | ErrorKind::BadFormat => 400,
        ErrorKind::Database | ErrorKind::Internal => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_reports_404_with_message() {
        let err = ServiceError::Store(StoreError::NotFound {
            id: "nonexistent-id".into(),
        });
        let report = report(&err);
        assert_eq!(report.code, "NOT_FOUND");
        assert_eq!(report.status, 404);
        assert!(report.message.contains("nonexistent-id"));
    }

    #[test]
    fn bad_params_report_400() {
        let err = ServiceError::invalid_param("k", "`abc` does not match ^\\d+$");
        let report = report(&err);
        assert_eq!(report.code, "BAD_VALUE");
        assert_eq!(report.status, 400);
    }

    #[test]
    fn server_faults_report_generically() {
        let err = ServiceError::Store(StoreError::Engine("connection reset".into()));
        let report = report(&err);
        assert_eq!(report.code, "DATABASE");
        assert_eq!(report.status, 500);
        assert_eq!(report.message, "internal server error");
        assert!(!report.message.contains("connection reset"));
    }

    #[test]
    fn classify_faults_are_client_errors() {
        let err = ServiceError::Classify(ClassifyError::EmptyTrainingSet);
        let report = report(&err);
        assert_eq!(report.code, "BAD_FORMAT");
        assert_eq!(report.status, 400);
        assert!(report.message.contains("empty training set"));
    }
}
