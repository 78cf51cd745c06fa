//! KNN feature data model
//!
//! Core types shared by every crate in the workspace.
//!
//! # Core Concepts
//!
//! - [`FeatureVector`]: ordered `u8` feature bytes with base64 transport encoding
//! - [`FeaturesPayload`]: raw-or-encoded input union, normalized at the boundary
//! - [`Sample`]: training/test union; the label exists exactly on training samples
//! - [`FeaturesId`]: content-addressed id rendered `<tag>-<64 hex>` (Blake3)
//! - [`ErrorKind`]: coarse failure taxonomy shared across the workspace
//!
//! # Example
//!
//! ```rust
//! use knn_features::{FeatureVector, FeaturesId, Partition, FULL_ID_LEN};
//!
//! let v = FeatureVector::new(vec![0, 2, 54, 3, 5]);
//! let id = FeaturesId::of(&v, Some("3"));
//! assert_eq!(id.partition(), Partition::Training);
//! assert_eq!(id.to_string().len(), FULL_ID_LEN);
//! ```

#![warn(unreachable_pub)]

mod error;
mod id;
mod sample;
mod vector;

pub use error::{ErrorKind, FeaturesError};
pub use id::{FeaturesId, DIGEST_LEN, FULL_ID_LEN};
pub use sample::{Label, LabeledFeatures, Partition, Sample, TrainingFeatures};
pub use vector::{FeatureVector, FeaturesPayload};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
