//! Error types for corpus decoding
//!
//! Two failure families:
//! - header values that disagree with what the caller declared (`BadValue`)
//! - blobs that are internally inconsistent (`BadFormat`)

use std::fmt::{self, Display, Formatter};

use knn_features::ErrorKind;

/// Which of the paired blobs an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blob {
    /// The image blob
    Images,
    /// The label blob
    Labels,
}

impl Display for Blob {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Images => "images",
            Self::Labels => "labels",
        })
    }
}

/// Errors from decoding an image corpus
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// A header field disagrees with the caller-declared expectation
    #[error("{blob} header {field}: expected {expected:#x}, got {actual:#x}")]
    HeaderMismatch {
        /// Blob whose header is wrong
        blob: Blob,
        /// Header field name
        field: &'static str,
        /// Declared expectation
        expected: u32,
        /// Value found in the blob
        actual: u32,
    },

    /// Image and label headers declare different record counts
    #[error("record count mismatch: images declare {images}, labels declare {labels}")]
    CountMismatch {
        /// Count from the image header
        images: u32,
        /// Count from the label header
        labels: u32,
    },

    /// A blob's byte length disagrees with its header
    #[error("{blob} length mismatch: header implies {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Blob whose length is wrong
        blob: Blob,
        /// Length implied by the header
        expected: usize,
        /// Actual blob length
        actual: usize,
    },

    /// A blob too short to hold its fixed-size header
    #[error("{blob} truncated: {actual} bytes is shorter than the {header}-byte header")]
    TruncatedHeader {
        /// Blob that is too short
        blob: Blob,
        /// Required header length
        header: usize,
        /// Actual blob length
        actual: usize,
    },
}

impl CorpusError {
    pub(crate) fn header_mismatch(
        blob: Blob,
        field: &'static str,
        expected: u32,
        actual: u32,
    ) -> Self {
        Self::HeaderMismatch {
            blob,
            field,
            expected,
            actual,
        }
    }

    pub(crate) fn count_mismatch(images: u32, labels: u32) -> Self {
        Self::CountMismatch { images, labels }
    }

    pub(crate) fn length_mismatch(blob: Blob, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            blob,
            expected,
            actual,
        }
    }

    pub(crate) fn truncated_header(blob: Blob, header: usize, actual: usize) -> Self {
        Self::TruncatedHeader {
            blob,
            header,
            actual,
        }
    }

    /// The kind of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HeaderMismatch { .. } => ErrorKind::BadValue,
            Self::CountMismatch { .. }
            | Self::LengthMismatch { .. }
            | Self::TruncatedHeader { .. } => ErrorKind::BadFormat,
        }
    }
}
