//! Error types for classification

use knn_features::ErrorKind;

/// Errors from a classification call
///
/// All of these are structural faults in the request, so they share the
/// `BadFormat` kind.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// No training samples to vote over
    #[error("empty training set")]
    EmptyTrainingSet,

    /// k must be at least 1
    #[error("k must be positive")]
    ZeroK,

    /// A training vector's length disagrees with the query's
    #[error(
        "dimension mismatch at training index {index}: \
         query has {query} features, candidate has {candidate}"
    )]
    DimensionMismatch {
        /// Index of the first offending training sample
        index: usize,
        /// Query vector length
        query: usize,
        /// Candidate vector length
        candidate: usize,
    },
}

impl ClassifyError {
    /// The kind of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::BadFormat
    }
}
