//! KNN corpus codec
//!
//! Pure decoding of paired image/label binary corpora into labeled
//! feature vectors.
//!
//! # Core Concepts
//!
//! - [`CorpusSpec`]: caller-declared header expectations ([`CorpusSpec::mnist`] for the usual one)
//! - [`RawCorpus`]: borrowed image/label blob pair
//! - [`decode`]: validate headers, cross-check the blobs, slice out records
//!
//! Decoding is deterministic and does no I/O; reading blobs off disk is
//! the caller's concern.

#![warn(unreachable_pub)]

mod codec;
mod error;

pub use codec::{decode, CorpusSpec, RawCorpus, IMAGE_HEADER_LEN, LABEL_HEADER_LEN};
pub use error::{Blob, CorpusError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
