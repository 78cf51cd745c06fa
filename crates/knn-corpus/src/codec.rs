//! Binary corpus decoding
//!
//! A corpus arrives as two blobs: images and labels. Both start with
//! big-endian `u32` header fields, validated against caller-declared
//! expectations before any record is sliced out.
//!
//! Image blob layout: `[magic:4][count:4][rows:4][cols:4][pixels...]`
//! Label blob layout: `[magic:4][count:4][labels...]`

use serde::{Deserialize, Serialize};

use knn_features::{FeatureVector, LabeledFeatures};

use crate::error::{Blob, CorpusError};

/// Byte length of the image blob header
pub const IMAGE_HEADER_LEN: usize = 16;

/// Byte length of the label blob header
pub const LABEL_HEADER_LEN: usize = 8;

/// Caller-declared header expectations for a corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSpec {
    /// Expected image blob magic number
    pub image_magic: u32,
    /// Expected label blob magic number
    pub label_magic: u32,
    /// Expected image height in pixels
    pub rows: u32,
    /// Expected image width in pixels
    pub cols: u32,
}

impl CorpusSpec {
    /// The MNIST handwritten-digit corpus headers (28 x 28)
    #[must_use]
    pub const fn mnist() -> Self {
        Self {
            image_magic: 0x0803,
            label_magic: 0x0801,
            rows: 28,
            cols: 28,
        }
    }

    /// Features per record (rows * cols)
    #[inline]
    #[must_use]
    pub const fn features_per_record(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for CorpusSpec {
    fn default() -> Self {
        Self::mnist()
    }
}

/// Borrowed views over the paired corpus blobs
#[derive(Debug, Clone, Copy)]
pub struct RawCorpus<'a> {
    /// The image blob
    pub images: &'a [u8],
    /// The label blob
    pub labels: &'a [u8],
}

struct ImageHeader {
    magic: u32,
    count: u32,
    rows: u32,
    cols: u32,
}

impl ImageHeader {
    fn read(blob: &[u8]) -> Result<Self, CorpusError> {
        if blob.len() < IMAGE_HEADER_LEN {
            return Err(CorpusError::truncated_header(
                Blob::Images,
                IMAGE_HEADER_LEN,
                blob.len(),
            ));
        }
        Ok(Self {
            magic: read_be_u32(blob, 0),
            count: read_be_u32(blob, 4),
            rows: read_be_u32(blob, 8),
            cols: read_be_u32(blob, 12),
        })
    }

    fn validate(&self, spec: &CorpusSpec) -> Result<(), CorpusError> {
        if self.magic != spec.image_magic {
            return Err(CorpusError::header_mismatch(
                Blob::Images,
                "magic",
                spec.image_magic,
                self.magic,
            ));
        }
        if self.rows != spec.rows {
            return Err(CorpusError::header_mismatch(
                Blob::Images,
                "rows",
                spec.rows,
                self.rows,
            ));
        }
        if self.cols != spec.cols {
            return Err(CorpusError::header_mismatch(
                Blob::Images,
                "cols",
                spec.cols,
                self.cols,
            ));
        }
        Ok(())
    }
}

struct LabelHeader {
    magic: u32,
    count: u32,
}

impl LabelHeader {
    fn read(blob: &[u8]) -> Result<Self, CorpusError> {
        if blob.len() < LABEL_HEADER_LEN {
            return Err(CorpusError::truncated_header(
                Blob::Labels,
                LABEL_HEADER_LEN,
                blob.len(),
            ));
        }
        Ok(Self {
            magic: read_be_u32(blob, 0),
            count: read_be_u32(blob, 4),
        })
    }

    fn validate(&self, spec: &CorpusSpec) -> Result<(), CorpusError> {
        if self.magic != spec.label_magic {
            return Err(CorpusError::header_mismatch(
                Blob::Labels,
                "magic",
                spec.label_magic,
                self.magic,
            ));
        }
        Ok(())
    }
}

// Callers bounds-check before reading
fn read_be_u32(blob: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&blob[offset..offset + 4]);
    u32::from_be_bytes(bytes)
}

/// Decode a paired corpus into labeled samples
///
/// Headers are validated against `spec` first (mismatches are
/// `BadValue`), then the two blobs are checked for structural
/// consistency with each other and with their declared counts
/// (`BadFormat`). On success every record becomes a training-shaped
/// [`LabeledFeatures`] whose label is the decimal rendering of its
/// label byte, in corpus order.
///
/// # Errors
/// See [`CorpusError`] for the failure taxonomy.
pub fn decode(
    spec: &CorpusSpec,
    corpus: RawCorpus<'_>,
) -> Result<Vec<LabeledFeatures>, CorpusError> {
    let image_header = ImageHeader::read(corpus.images)?;
    image_header.validate(spec)?;
    let label_header = LabelHeader::read(corpus.labels)?;
    label_header.validate(spec)?;

    if image_header.count != label_header.count {
        return Err(CorpusError::count_mismatch(
            image_header.count,
            label_header.count,
        ));
    }

    let count = image_header.count as usize;
    let record_len = spec.features_per_record();

    // Saturated totals can never equal a real buffer length, so a
    // pathological header still reports as a mismatch instead of wrapping
    let expected_images = count
        .saturating_mul(record_len)
        .saturating_add(IMAGE_HEADER_LEN);
    if corpus.images.len() != expected_images {
        return Err(CorpusError::length_mismatch(
            Blob::Images,
            expected_images,
            corpus.images.len(),
        ));
    }
    let expected_labels = count.saturating_add(LABEL_HEADER_LEN);
    if corpus.labels.len() != expected_labels {
        return Err(CorpusError::length_mismatch(
            Blob::Labels,
            expected_labels,
            corpus.labels.len(),
        ));
    }

    let mut samples = Vec::with_capacity(count);
    for i in 0..count {
        let start = IMAGE_HEADER_LEN + i * record_len;
        let features = FeatureVector::new(corpus.images[start..start + record_len].to_vec());
        let label = corpus.labels[LABEL_HEADER_LEN + i].to_string();
        samples.push(LabeledFeatures::labeled(features, label));
    }
    Ok(samples)
}
