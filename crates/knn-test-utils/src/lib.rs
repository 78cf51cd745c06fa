//! Testing utilities for the KNN workspace
//!
//! Shared fixtures: canned labeled samples and a corpus blob builder that
//! writes the binary layout by hand, independently of the production
//! decoder, so layout bugs cannot cancel out in tests.

#![allow(missing_docs)]

use knn_features::{FeatureVector, LabeledFeatures};

pub const MNIST_IMAGE_MAGIC: u32 = 0x0803;
pub const MNIST_LABEL_MAGIC: u32 = 0x0801;

pub fn labeled(bytes: &[u8], label: &str) -> LabeledFeatures {
    LabeledFeatures::labeled(FeatureVector::new(bytes.to_vec()), label)
}

pub fn unlabeled(bytes: &[u8]) -> LabeledFeatures {
    LabeledFeatures::unlabeled(FeatureVector::new(bytes.to_vec()))
}

/// Canned labeled sample set covering empty, short, and 256-length vectors
pub fn sample_features() -> Vec<LabeledFeatures> {
    vec![
        labeled(&[0, 2, 54, 3, 5], "a"),
        labeled(&[0, 5, 10, 222, 244, 255], "b"),
        labeled(&[10, 20, 30, 40, 50, 60, 70, 80], "c"),
        labeled(&[], "d"),
        LabeledFeatures::labeled(FeatureVector::new((0..=255).collect()), "a"),
    ]
}

/// Builds paired image/label corpus blobs byte by byte
///
/// Header fields are written big-endian in the fixed layout
/// `[magic][count][rows][cols]` for images and `[magic][count]` for
/// labels. Overrides let tests mis-declare counts, swap magics, or
/// truncate blobs to drive decoder failure paths.
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    image_magic: u32,
    label_magic: u32,
    rows: u32,
    cols: u32,
    samples: Vec<(Vec<u8>, u8)>,
    image_count_override: Option<u32>,
    label_count_override: Option<u32>,
    image_truncate: Option<usize>,
    label_truncate: Option<usize>,
}

impl CorpusBuilder {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            image_magic: MNIST_IMAGE_MAGIC,
            label_magic: MNIST_LABEL_MAGIC,
            rows,
            cols,
            samples: Vec::new(),
            image_count_override: None,
            label_count_override: None,
            image_truncate: None,
            label_truncate: None,
        }
    }

    pub fn mnist() -> Self {
        Self::new(28, 28)
    }

    #[must_use]
    pub fn with_image_magic(mut self, magic: u32) -> Self {
        self.image_magic = magic;
        self
    }

    #[must_use]
    pub fn with_label_magic(mut self, magic: u32) -> Self {
        self.label_magic = magic;
        self
    }

    /// Mis-declare the image header count
    #[must_use]
    pub fn with_image_count(mut self, count: u32) -> Self {
        self.image_count_override = Some(count);
        self
    }

    /// Mis-declare the label header count
    #[must_use]
    pub fn with_label_count(mut self, count: u32) -> Self {
        self.label_count_override = Some(count);
        self
    }

    /// Cut the finished image blob down to `len` bytes
    #[must_use]
    pub fn truncate_images(mut self, len: usize) -> Self {
        self.image_truncate = Some(len);
        self
    }

    /// Cut the finished label blob down to `len` bytes
    #[must_use]
    pub fn truncate_labels(mut self, len: usize) -> Self {
        self.label_truncate = Some(len);
        self
    }

    /// Append a sample; `pixels` must be exactly rows * cols bytes
    #[must_use]
    pub fn push(mut self, pixels: Vec<u8>, label: u8) -> Self {
        assert_eq!(
            pixels.len(),
            (self.rows * self.cols) as usize,
            "fixture pixels must match declared dimensions"
        );
        self.samples.push((pixels, label));
        self
    }

    /// Append a sample whose pixels are all `intensity`
    #[must_use]
    pub fn push_uniform(self, intensity: u8, label: u8) -> Self {
        let len = (self.rows * self.cols) as usize;
        self.push(vec![intensity; len], label)
    }

    /// Render `(images, labels)` blobs
    pub fn build(&self) -> (Vec<u8>, Vec<u8>) {
        let count = u32::try_from(self.samples.len()).unwrap();

        let mut images = Vec::new();
        images.extend_from_slice(&self.image_magic.to_be_bytes());
        images.extend_from_slice(&self.image_count_override.unwrap_or(count).to_be_bytes());
        images.extend_from_slice(&self.rows.to_be_bytes());
        images.extend_from_slice(&self.cols.to_be_bytes());
        for (pixels, _) in &self.samples {
            images.extend_from_slice(pixels);
        }
        if let Some(len) = self.image_truncate {
            images.truncate(len);
        }

        let mut labels = Vec::new();
        labels.extend_from_slice(&self.label_magic.to_be_bytes());
        labels.extend_from_slice(&self.label_count_override.unwrap_or(count).to_be_bytes());
        for (_, label) in &self.samples {
            labels.push(*label);
        }
        if let Some(len) = self.label_truncate {
            labels.truncate(len);
        }

        (images, labels)
    }
}
