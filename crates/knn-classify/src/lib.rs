//! KNN classifier
//!
//! Exact brute-force k-nearest-neighbor classification over byte
//! feature vectors.
//!
//! # Core Concepts
//!
//! - [`classify`]: scan, retain the k nearest, majority-vote the label
//! - [`Classification`]: winning label, rank-1 index, ranked neighbors
//! - [`Neighbor`]: one retained candidate with its exact squared distance
//!
//! The scan is a pure function of its inputs. Large training sets are
//! scanned in parallel with a result bit-identical to the sequential
//! scan.

#![warn(unreachable_pub)]

mod error;
mod knn;

pub use error::ClassifyError;
pub use knn::{classify, Classification, Neighbor};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
